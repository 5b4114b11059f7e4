use super::*;

fn vocab() -> Vocabulary {
    Vocabulary {
        sites: default_sites(),
        vendors: default_vendors(),
    }
}

#[test]
fn test_exact_site_lookup_is_case_insensitive() {
    let v = vocab();
    let (value, hit) = v.lookup_site("das", 0.82).unwrap();
    assert_eq!(value, "DAS");
    assert_eq!(hit, VocabHit::Exact);

    let (value, _) = v.lookup_site("MirFa", 0.82).unwrap();
    assert_eq!(value, "MIRFA");
}

#[test]
fn test_alias_resolves_to_canonical() {
    let v = vocab();
    let (value, hit) = v.lookup_site("Shuweihat", 0.82).unwrap();
    assert_eq!(value, "SHU");
    assert_eq!(hit, VocabHit::Exact);

    let (value, _) = v.lookup_vendor("he", 0.82).unwrap();
    assert_eq!(value, "Hitachi Energy");

    let (value, _) = v.lookup_vendor("sct", 0.82).unwrap();
    assert_eq!(value, "Samsung C&T");
}

#[test]
fn test_fuzzy_lookup_above_threshold() {
    let v = vocab();
    // One edit away from "ghallan".
    let (value, hit) = v.lookup_site("Ghalan", 0.82).unwrap();
    assert_eq!(value, "GHALLAN");
    match hit {
        VocabHit::Fuzzy(score) => assert!(score >= 0.82, "score {score}"),
        other => panic!("expected fuzzy hit, got {other:?}"),
    }

    // Typo in "hitachi energy".
    let (value, hit) = v.lookup_vendor("Hitachi Enery", 0.82).unwrap();
    assert_eq!(value, "Hitachi Energy");
    assert!(matches!(hit, VocabHit::Fuzzy(_)));
}

#[test]
fn test_below_threshold_is_rejected() {
    let v = vocab();
    assert!(v.lookup_site("warehouse", 0.82).is_err());
    assert!(v.lookup_vendor("unknown corp", 0.82).is_err());
}

#[test]
fn test_threshold_is_honored() {
    let v = vocab();
    // "Ghalan" clears 0.82 but not 0.99.
    assert!(v.lookup_site("Ghalan", 0.82).is_ok());
    assert!(v.lookup_site("Ghalan", 0.99).is_err());
}

#[test]
fn test_empty_token_is_rejected() {
    let v = vocab();
    assert!(v.lookup_site("", 0.5).is_err());
    assert!(v.lookup_vendor("   ", 0.5).is_err());
}
