use std::io::Cursor;

use ogx_core::ObjectId;

use crate::bytes::{ByteReader, ByteWriter, SliceReader, StreamReader};
use crate::error::WireError;

#[test]
fn fixed_width_values_are_little_endian() {
    let mut w = ByteWriter::new();
    w.add_i32(1);
    w.add_i64(-2);
    w.add_byte(0xab);

    assert_eq!(
        w.as_slice(),
        &[1, 0, 0, 0, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xab]
    );
}

#[test]
fn string_is_length_prefixed() {
    let mut w = ByteWriter::new();
    w.add_string("hé").unwrap();

    assert_eq!(w.as_slice(), &[3, 0, 0, 0, b'h', 0xc3, 0xa9]);
}

#[test]
fn id_list_has_int64_count() {
    let mut w = ByteWriter::new();
    w.add_id_list(&[ObjectId::new(7)]);

    assert_eq!(w.len(), 16);
    let mut r = SliceReader::new(w.as_slice());
    assert_eq!(r.read_id_list().unwrap(), vec![ObjectId::new(7)]);
    assert!(r.is_at_end());
}

#[test]
fn reads_mixed_fields_in_order() {
    let mut w = ByteWriter::new();
    w.add_f64(1.5);
    w.add_bool(true);
    w.add_string_tuple(&["a".into(), "bc".into()]).unwrap();

    let mut r = SliceReader::new(w.as_slice());
    assert_eq!(r.read_f64().unwrap(), 1.5);
    assert!(r.read_bool().unwrap());
    assert_eq!(r.read_string_tuple().unwrap(), vec!["a", "bc"]);
    assert_eq!(r.offset(), w.len());
}

#[test]
fn slice_reader_reports_truncation() {
    let data = [5, 0, 0, 0, b'a', b'b'];
    let mut r = SliceReader::new(&data);

    let err = r.read_string().unwrap_err();

    insta::assert_snapshot!(err, @"stream terminated unexpectedly at byte 4 (3 more bytes expected)");
}

#[test]
fn stream_reader_reports_truncation() {
    let mut r = StreamReader::new(Cursor::new(vec![1, 2, 3]));

    let err = r.read_i64().unwrap_err();

    assert!(matches!(err, WireError::Truncated { offset: 3, needed: 5 }));
}

#[test]
fn stream_reader_does_not_trust_huge_lengths() {
    let mut w = ByteWriter::new();
    w.add_i32(i32::MAX);
    w.add_byte(b'x');
    let mut r = StreamReader::new(Cursor::new(w.into_vec()));

    let err = r.read_blob().unwrap_err();

    assert!(matches!(err, WireError::Truncated { offset: 5, .. }));
}

#[test]
fn negative_length_is_rejected() {
    let mut w = ByteWriter::new();
    w.add_i32(-1);
    let mut r = SliceReader::new(w.as_slice());

    let err = r.read_string().unwrap_err();

    insta::assert_snapshot!(err, @"negative length -1 at byte 0");
}

#[test]
fn invalid_utf8_is_rejected() {
    let mut w = ByteWriter::new();
    w.add_blob(&[0xff, 0xfe]).unwrap();
    let mut r = SliceReader::new(w.as_slice());

    assert!(matches!(
        r.read_string().unwrap_err(),
        WireError::InvalidUtf8 { offset: 0 }
    ));
}

#[test]
fn bool_must_be_zero_or_one() {
    let mut r = SliceReader::new(&[2]);

    insta::assert_snapshot!(r.read_bool().unwrap_err(), @"invalid bool byte 0x02 at byte 0");
}

#[test]
fn negative_line_is_out_of_range() {
    let mut w = ByteWriter::new();
    w.add_i32(-4);
    let mut r = SliceReader::new(w.as_slice());

    insta::assert_snapshot!(r.read_line32().unwrap_err(), @"line -4 out of range at byte 0");
}
