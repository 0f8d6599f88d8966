use std::path::Path;

use petri_core::error::PetriError;
use petri_core::parse::parse_plane_filename;

#[test]
fn test_parse_standard_filename() {
    let meta = parse_plane_filename(Path::new("240101_B02_s1_w1.tif")).unwrap();
    assert_eq!(meta.date, "240101");
    assert_eq!(meta.well, "B02");
    assert_eq!(meta.site, "1");
    assert_eq!(meta.channel, 0);
}

#[test]
fn test_parse_full_path() {
    let meta = parse_plane_filename(Path::new("/data/plate7/240115_C03_s2_w3.TIF")).unwrap();
    assert_eq!(meta.well, "C03");
    assert_eq!(meta.site, "2");
    assert_eq!(meta.channel, 2);
}

#[test]
fn test_parse_multi_digit_site() {
    let meta = parse_plane_filename(Path::new("240101_B02_s12_w2.tif")).unwrap();
    assert_eq!(meta.site, "12");
    assert_eq!(meta.channel, 1);
}

#[test]
fn test_parse_ignores_trailing_tokens() {
    let meta = parse_plane_filename(Path::new("240101_B02_s1_w2_thumb4F.tif")).unwrap();
    assert_eq!(meta.channel, 1);
}

#[test]
fn test_parse_too_few_tokens_fails() {
    let result = parse_plane_filename(Path::new("bad_name.tif"));
    assert!(matches!(result, Err(PetriError::Parse { .. })));
}

#[test]
fn test_parse_non_numeric_channel_fails() {
    let result = parse_plane_filename(Path::new("240101_B02_s1_wx.tif"));
    assert!(matches!(result, Err(PetriError::Parse { .. })));
}

#[test]
fn test_parse_bad_site_token_fails() {
    let result = parse_plane_filename(Path::new("240101_B02_x1_w1.tif"));
    assert!(matches!(result, Err(PetriError::Parse { .. })));
}

#[test]
fn test_parse_channel_zero_fails() {
    let result = parse_plane_filename(Path::new("240101_B02_s1_w0.tif"));
    assert!(matches!(result, Err(PetriError::Parse { .. })));
}
