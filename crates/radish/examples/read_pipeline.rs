//! Walk a pipelined byte stream and print each decoded command.

use radish::Reader;

fn main() -> Result<(), radish::RespError> {
    let input: &[u8] =
        b"*2\r\n$3\r\nGET\r\n$5\r\nmykey\r\n*3\r\n$3\r\nSET\r\n$5\r\nmykey\r\n$7\r\nmyvalue\r\n";
    let mut reader = Reader::new(input);

    loop {
        let frame = match reader.read_command() {
            Ok(frame) => frame,
            Err(err) if err.is_end_of_stream() => break,
            Err(err) => return Err(err),
        };

        println!("raw: {:?}", String::from_utf8_lossy(frame.raw()));
        for (i, arg) in frame.args().enumerate() {
            println!("{}. {:?}", i, String::from_utf8_lossy(arg));
        }
        println!();
    }

    Ok(())
}
