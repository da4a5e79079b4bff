//! Serialize a command and a few typical replies to one buffer.

use radish::{ProtocolError, Writer};

fn main() -> std::io::Result<()> {
    let mut wire = Vec::new();

    let mut writer = Writer::new(&mut wire);
    writer.write_array(3)?;
    writer.write_string("SET")?;
    writer.write_string("mykey")?;
    writer.write_string("myvalue")?;

    writer.write_simple_string("OK")?;
    writer.write_int(42)?;
    writer.write_null()?;
    writer.write_error(&ProtocolError::new(
        "WRONGTYPE",
        "Operation against a key holding the wrong kind of value",
    ))?;
    writer.flush()?;
    drop(writer);

    print!("{}", String::from_utf8_lossy(&wire));
    Ok(())
}
