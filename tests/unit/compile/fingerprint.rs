use super::*;

fn set(entries: &[(&str, &str)]) -> ArtifactSet {
    let mut s = ArtifactSet::new();
    for (p, b) in entries {
        s.insert(*p, *b).unwrap();
    }
    s
}

#[test]
fn insertion_order_does_not_matter() {
    let a = set(&[("x", "1"), ("y", "2")]);
    let b = set(&[("y", "2"), ("x", "1")]);
    assert_eq!(fingerprint_artifacts(&a), fingerprint_artifacts(&b));
}

#[test]
fn path_and_content_both_count() {
    let base = fingerprint_artifacts(&set(&[("x", "12")]));
    assert_ne!(base, fingerprint_artifacts(&set(&[("x", "13")])));
    assert_ne!(base, fingerprint_artifacts(&set(&[("z", "12")])));
    // moving a byte across the path/content boundary changes the hash
    assert_ne!(base, fingerprint_artifacts(&set(&[("x1", "2")])));
}

#[test]
fn display_is_32_hex_digits() {
    let fp = fingerprint_artifacts(&ArtifactSet::new());
    let s = fp.to_string();
    assert_eq!(s.len(), 32);
    assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
}
