use super::*;

#[test]
fn test_rejects_empty_bytecode() {
    assert!(spirv_words(&[]).is_err());
}

#[test]
fn test_rejects_unaligned_bytecode() {
    let err = spirv_words(&[0x03, 0x02, 0x23, 0x07, 0x00]).unwrap_err();
    assert!(err.contains("multiple of 4"));
}

#[test]
fn test_rejects_bad_magic() {
    let err = spirv_words(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap_err();
    assert!(err.contains("magic"));
}

#[test]
fn test_words_are_little_endian() {
    let bytes = [0x03, 0x02, 0x23, 0x07, 0x00, 0x00, 0x01, 0x00];
    let words = spirv_words(&bytes).unwrap();
    assert_eq!(words, vec![SPIRV_MAGIC, 0x0001_0000]);
}

#[test]
fn test_reflect_rejects_non_spirv() {
    let err = reflect_spirv(b"DXBC....").unwrap_err();
    assert!(err.contains("magic"));
}
