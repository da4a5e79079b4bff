//! Integration tests for the RESP reader.

use bytes::Bytes;
use radish::{DataType, ProtocolError, Reader, RespError, Value, Writer};
use rstest::rstest;

fn long_string() -> String {
    let mut s = "very".repeat(16 * 1024);
    s.push_str("-long-string");
    s
}

/// Serialize one command through the writer, so reader tests consume the
/// same bytes the writer produces.
fn raw_command(args: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut writer = Writer::new(&mut out);
    writer.write_array(args.len() as i64).unwrap();
    for arg in args {
        writer.write_bytes(arg).unwrap();
    }
    writer.flush().unwrap();
    drop(writer);
    out
}

/// Feed the concatenated commands to one reader and check every frame's
/// raw bytes and argument views, then the trailing end-of-stream.
fn check_commands(commands: &[&[&[u8]]]) {
    let mut input = Vec::new();
    let mut raws = Vec::new();
    for args in commands {
        let raw = raw_command(args);
        input.extend_from_slice(&raw);
        raws.push(raw);
    }

    let mut reader = Reader::new(input.as_slice());
    for (args, raw) in commands.iter().zip(&raws) {
        let frame = reader.read_command().expect("command should parse");

        assert_eq!(frame.raw(), &raw[..], "raw bytes should match the wire");
        assert_eq!(frame.len(), args.len());
        for (i, want) in args.iter().enumerate() {
            assert_eq!(frame.arg(i), Some(*want), "arg {i} should match");
        }
        assert_eq!(frame.args().collect::<Vec<_>>(), *args);
    }

    let err = reader.read_command().expect_err("input should be drained");
    assert!(err.is_end_of_stream(), "want end of stream, got {err:?}");
}

#[test]
fn test_read_command_ping() {
    check_commands(&[&[b"PING"]]);
}

#[test]
fn test_read_command_set() {
    check_commands(&[&[b"SET", b"test-key", b"test-value"]]);
}

#[test]
fn test_read_command_pipeline() {
    check_commands(&[
        &[b"SET", b"test-key", b"test-value"],
        &[b"PING"],
        &[b"SET", b"test-key", b"test-value"],
        &[b"PING"],
    ]);
}

#[test]
fn test_read_command_long_input() {
    let long = long_string();
    check_commands(&[&[b"SET", long.as_bytes(), b"test-value"]]);
}

#[test]
fn test_read_command_binary_safe_args() {
    // Bulk contents carry embedded CR and LF unchanged.
    check_commands(&[&[b"SET", b"key", b"a\r\nb\nc\r!"]]);
}

#[test]
fn test_read_command_pipelined_literal() {
    let input: &[u8] =
        b"*2\r\n$3\r\nGET\r\n$5\r\nmykey\r\n*3\r\n$3\r\nSET\r\n$5\r\nmykey\r\n$7\r\nmyvalue\r\n";
    let mut reader = Reader::new(input);

    let first = reader.read_command().unwrap();
    assert_eq!(first.raw(), b"*2\r\n$3\r\nGET\r\n$5\r\nmykey\r\n");
    assert_eq!(first.args().collect::<Vec<_>>(), [&b"GET"[..], b"mykey"]);

    let second = reader.read_command().unwrap();
    assert_eq!(
        second.raw(),
        b"*3\r\n$3\r\nSET\r\n$5\r\nmykey\r\n$7\r\nmyvalue\r\n"
    );
    assert_eq!(
        second.args().collect::<Vec<_>>(),
        [&b"SET"[..], b"mykey", b"myvalue"]
    );

    // Both frames stay valid side by side; they are distinct pool entries.
    assert_eq!(first.arg(0), Some(&b"GET"[..]));

    assert!(reader.read_command().unwrap_err().is_end_of_stream());
}

#[test]
fn test_read_command_skips_empty_arrays() {
    let mut input = b"*0\r\n*-1\r\n".to_vec();
    input.extend_from_slice(&raw_command(&[b"PING"]));

    let mut reader = Reader::new(input.as_slice());
    let frame = reader.read_command().expect("command should parse");

    // The skipped headers are not part of the returned command's raw form.
    assert_eq!(frame.raw(), b"*1\r\n$4\r\nPING\r\n");
    assert_eq!(frame.arg(0), Some(&b"PING"[..]));
}

#[rstest]
#[case(&b"+OK\r\n"[..], DataType::SimpleString, Value::SimpleString("OK".into()))]
#[case(&b"+OK\n \r\r\n"[..], DataType::SimpleString, Value::SimpleString("OK\n \r".into()))]
#[case(&b"+\r\n"[..], DataType::SimpleString, Value::SimpleString("".into()))]
#[case(
    &b"-ERR unknown command 'GO'\r\n"[..],
    DataType::Error,
    Value::Error(ProtocolError::new("ERR", "unknown command 'GO'"))
)]
#[case(
    &b"-ERR unknown\r command\n 'GO'\n\r\n"[..],
    DataType::Error,
    Value::Error(ProtocolError::new("ERR", "unknown\r command\n 'GO'\n"))
)]
#[case(&b"-ERR\r\n"[..], DataType::Error, Value::Error(ProtocolError::new("ERR", "")))]
#[case(&b"-\r\n"[..], DataType::Error, Value::Error(ProtocolError::new("", "")))]
#[case(&b":1337\r\n"[..], DataType::Integer, Value::Integer(1337))]
#[case(&b":-1337\r\n"[..], DataType::Integer, Value::Integer(-1337))]
#[case(
    &b"$11\r\nhello world\r\n"[..],
    DataType::BulkString,
    Value::Bulk(Bytes::from_static(b"hello world"))
)]
#[case(&b"$0\r\n\r\n"[..], DataType::BulkString, Value::Bulk(Bytes::new()))]
#[case(&b"$-1\r\n"[..], DataType::Null, Value::Null)]
#[case(&b"*10\r\n"[..], DataType::Array, Value::Array(10))]
#[case(&b"*-1\r\n"[..], DataType::Array, Value::Array(-1))]
fn test_read_any(#[case] input: &[u8], #[case] want_type: DataType, #[case] want: Value) {
    let mut reader = Reader::new(input);

    let (dt, value) = reader.read_any().expect("value should parse");
    assert_eq!(dt, want_type);
    assert_eq!(value, want);

    let err = reader.read_any().expect_err("stream should be drained");
    assert!(err.is_end_of_stream(), "want end of stream, got {err:?}");
}

#[test]
fn test_read_any_unknown_reply_type() {
    let mut reader = Reader::new(&b"?foo\r\n"[..]);
    let err = reader.read_any().unwrap_err();

    match err {
        RespError::Protocol(e) => {
            assert_eq!(e.kind, "ERR");
            assert_eq!(e.msg, "Protocol error, got \"?\" as reply type byte");
        }
        other => panic!("want protocol error, got {other:?}"),
    }
}

#[test]
fn test_read_typed_values() {
    let mut reader = Reader::new(&b"+OK\r\n-WRONGTYPE bad\r\n:42\r\n$5\r\nhello\r\n$-1\r\n*3\r\n"[..]);

    assert_eq!(reader.read_simple_string().unwrap(), "OK");
    assert_eq!(
        reader.read_error().unwrap(),
        ProtocolError::new("WRONGTYPE", "bad")
    );
    assert_eq!(reader.read_integer().unwrap(), 42);
    assert_eq!(
        reader.read_string().unwrap(),
        Some(Bytes::from_static(b"hello"))
    );
    assert_eq!(reader.read_string().unwrap(), None);
    assert_eq!(reader.read_array().unwrap(), 3);
}

#[rstest]
#[case(&b"*abc\r\n"[..])]
#[case(&b"*\r\n"[..])]
#[case(&b"*-\r\n"[..])]
#[case(&b"*12345678901234567890123456\r\n"[..])]
fn test_read_command_invalid_multibulk_length(#[case] input: &[u8]) {
    let mut reader = Reader::new(input);
    let err = reader.read_command().unwrap_err();

    match err {
        RespError::Protocol(e) => assert_eq!(e, ProtocolError::invalid_multibulk_length()),
        other => panic!("want invalid multibulk length, got {other:?}"),
    }
}

#[test]
fn test_read_command_length_line_is_bounded() {
    // A length line that never terminates fails on the 23-byte cap rather
    // than buffering the stream.
    let mut input = vec![b'*'];
    input.extend_from_slice(&[b'9'; 100]);

    let mut reader = Reader::new(input.as_slice());
    let err = reader.read_command().unwrap_err();

    match err {
        RespError::Protocol(e) => assert_eq!(e, ProtocolError::invalid_multibulk_length()),
        other => panic!("want invalid multibulk length, got {other:?}"),
    }
}

#[rstest]
#[case(&b"*1\r\n$-1\r\n"[..])]
#[case(&b"*1\r\n$abc\r\n"[..])]
#[case(&b"*1\r\n$5\r\nhelloXY"[..])]
fn test_read_command_invalid_bulk_length(#[case] input: &[u8]) {
    let mut reader = Reader::new(input);
    let err = reader.read_command().unwrap_err();

    match err {
        RespError::Protocol(e) => assert_eq!(e, ProtocolError::invalid_bulk_length()),
        other => panic!("want invalid bulk length, got {other:?}"),
    }
}

#[test]
fn test_read_command_wrong_discriminant() {
    let mut reader = Reader::new(&b"+OK\r\n"[..]);
    let err = reader.read_command().unwrap_err();

    match err {
        RespError::Protocol(e) => assert_eq!(e, ProtocolError::new("ERR", "expected '*', got '+'")),
        other => panic!("want framing error, got {other:?}"),
    }
}

#[test]
fn test_read_command_eof_mid_bulk() {
    let mut reader = Reader::new(&b"*1\r\n$5\r\nhel"[..]);
    let err = reader.read_command().unwrap_err();

    match err {
        RespError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("want unexpected eof, got {other:?}"),
    }
}

#[test]
fn test_read_command_eof_mid_header() {
    let mut reader = Reader::new(&b"*2\r\n$3\r\nGET\r\n"[..]);
    let err = reader.read_command().unwrap_err();

    match err {
        RespError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("want unexpected eof, got {other:?}"),
    }
}

#[test]
fn test_read_integer_invalid_value() {
    let mut reader = Reader::new(&b":abc\r\n"[..]);
    let err = reader.read_integer().unwrap_err();

    match err {
        RespError::Protocol(e) => assert_eq!(e, ProtocolError::invalid_integer_value()),
        other => panic!("want invalid integer value, got {other:?}"),
    }
}

#[test]
fn test_reset_rebinds_the_source() {
    let mut reader = Reader::new(&b"+first\r\n"[..]);
    assert_eq!(reader.read_simple_string().unwrap(), "first");

    reader.reset(&b"+second\r\n"[..]);
    assert_eq!(reader.read_simple_string().unwrap(), "second");
}

#[test]
fn test_round_trip_large_argument() {
    let long = long_string();
    let raw = raw_command(&[b"SET", long.as_bytes(), b"test-value"]);

    let mut reader = Reader::new(raw.as_slice());
    let frame = reader.read_command().unwrap();

    assert_eq!(frame.raw(), &raw[..]);
    assert_eq!(frame.arg(1), Some(long.as_bytes()));
    assert_eq!(frame.arg_to_vec(1), Some(long.into_bytes()));
}
