use super::*;

fn extractor() -> TitleExtractor {
    TitleExtractor::new(Arc::new(PatternRuleSet::builtin()), MapperSettings::default())
}

fn extract_title(title: &str) -> MappingResult {
    extractor().extract(&RawTitleItem::new("item-1", title))
}

fn values(result: &MappingResult, field: Field) -> Vec<&str> {
    result
        .matches
        .get(&field)
        .map(|candidates| candidates.iter().map(|c| c.normalized_value.as_str()).collect())
        .unwrap_or_default()
}

#[test]
fn test_adopt_code_is_authoritative_high() {
    let result = extract_title("[HVDC-ADOPT-SIM-0088] Material Delivery");
    let case = &result.matches[&Field::CaseNumber][0];
    assert_eq!(case.normalized_value, "HVDC-ADOPT-SIM-0088");
    assert_eq!(case.confidence, Confidence::High);
    assert_eq!(case.rule_id, "case_adopt");
    assert_eq!(values(&result, Field::Vendor), vec!["Siemens"]);
    assert_eq!(result.phase, ProjectPhase::Shipping);
    assert!(result.unmatched_fields.contains(&Field::Date));
    assert!(result.error.is_none());
}

#[test]
fn test_paren_shorthand_composes_adopt_code() {
    let result = extract_title("RE: Docu.Review PRL-ZAK-031-A(HE-0504) Shipping Docs");
    let case = &result.matches[&Field::CaseNumber][0];
    assert_eq!(case.normalized_value, "HVDC-ADOPT-HE-0504");
    assert_eq!(case.confidence, Confidence::Medium);
    assert_eq!(case.rule_id, "case_paren_short");
    assert_eq!(values(&result, Field::Site), vec!["ZAK"]);
    assert_eq!(values(&result, Field::Vendor), vec!["Hitachi Energy"]);
    assert_eq!(result.phase, ProjectPhase::Shipping);
}

#[test]
fn test_generic_code_with_site_and_vendor_tokens() {
    let result = extract_title("HVDC-AGI-SCT-0134 Project Update");
    assert_eq!(values(&result, Field::CaseNumber), vec!["HVDC-AGI-SCT-0134"]);
    assert_eq!(result.matches[&Field::CaseNumber][0].confidence, Confidence::Medium);
    assert_eq!(values(&result, Field::Site), vec!["AGI"]);
    assert_eq!(values(&result, Field::Vendor), vec!["Samsung C&T"]);
    assert_eq!(result.phase, ProjectPhase::General);
}

#[test]
fn test_jptw_grm_pair_composes_case_number() {
    let result = extract_title("JPTW-71 / GRM-123 Gate Pass");
    assert_eq!(values(&result, Field::CaseNumber), vec!["HVDC-AGI-JPTW71-GRM123"]);
}

#[test]
fn test_multiple_paren_codes_all_collected() {
    let result = extract_title("(HE-0427, HE-0428) Delivery Note");
    assert_eq!(
        values(&result, Field::CaseNumber),
        vec!["HVDC-ADOPT-HE-0427", "HVDC-ADOPT-HE-0428"]
    );
}

#[test]
fn test_invalid_date_falls_through_without_failing_item() {
    // 31-02 is not a calendar date; the date rule falls through and the
    // field ends up unmatched while the rest of the title still maps.
    let result = extract_title("Delivery 31-02-2024 DAS");
    assert!(result.unmatched_fields.contains(&Field::Date));
    assert_eq!(values(&result, Field::Site), vec!["DAS"]);
    assert!(result.error.is_none());
}

#[test]
fn test_two_digit_year_date_in_title() {
    let result = extract_title("Final Report 25-12-20 DAS");
    assert_eq!(values(&result, Field::Date), vec!["2020-12-25"]);
    assert_eq!(result.matches[&Field::Date][0].rule_id, "date_dmy");
}

#[test]
fn test_barren_title_yields_all_unmatched() {
    let result = extract_title("hello world");
    assert!(result.matches.is_empty());
    assert_eq!(result.unmatched_fields.len(), Field::ALL.len());
    assert_eq!(result.phase, ProjectPhase::General);
    assert!(result.lpo_numbers.is_empty());
    assert!(result.error.is_none());
}

#[test]
fn test_fuzzy_site_phrase_caps_at_medium() {
    let result = extract_title("Cargo to Ghalan site");
    let site = &result.matches[&Field::Site][0];
    assert_eq!(site.normalized_value, "GHALLAN");
    assert_eq!(site.confidence, Confidence::Medium);
    assert_eq!(site.rule_id, "site_phrase");
}

#[test]
fn test_exhaustive_mode_collects_fallback_candidates() {
    let rules = Arc::new(PatternRuleSet::builtin());
    let settings = MapperSettings::default();
    let default_run = TitleExtractor::new(rules.clone(), settings.clone())
        .extract(&RawTitleItem::new("a", "HVDC-ADOPT-HE-0427 (SCT-1001) Delivery"));
    assert_eq!(values(&default_run, Field::CaseNumber), vec!["HVDC-ADOPT-HE-0427"]);

    let exhaustive_run = TitleExtractor::new(rules, settings)
        .with_options(ExtractOptions { exhaustive: true })
        .extract(&RawTitleItem::new("a", "HVDC-ADOPT-HE-0427 (SCT-1001) Delivery"));
    let candidates = values(&exhaustive_run, Field::CaseNumber);
    assert_eq!(candidates[0], "HVDC-ADOPT-HE-0427");
    assert!(candidates.contains(&"HVDC-ADOPT-SCT-1001"));
    // Duplicate captures of the same code collapse to one candidate.
    assert_eq!(
        candidates.iter().filter(|v| **v == "HVDC-ADOPT-HE-0427").count(),
        1
    );
}

#[test]
fn test_extraction_is_idempotent() {
    let item = RawTitleItem::new("x", "HVDC-ADOPT-HE-0427 Shipment 2024-05-10 DAS");
    let e = extractor();
    let first = e.extract(&item);
    let second = e.extract(&item);
    assert_eq!(first.matches, second.matches);
    assert_eq!(first.unmatched_fields, second.unmatched_fields);
    assert_eq!(first.phase, second.phase);
    assert_eq!(first.lpo_numbers, second.lpo_numbers);
}

#[test]
fn test_context_passes_through_unmodified() {
    let mut item = RawTitleItem::new("msg-9", "HVDC-ADOPT-HE-0427");
    item.context.sender = Some("ops@example.com".to_string());
    let result = extractor().extract(&item);
    assert_eq!(result.source_id, "msg-9");
    assert_eq!(result.context.sender.as_deref(), Some("ops@example.com"));
}

#[test]
fn test_lpo_numbers_extracted_and_deduplicated() {
    let result = extract_title("SCT-19LT-PJC-LPO-1487_5 Order");
    assert_eq!(result.lpo_numbers, vec!["LPO-1487"]);
    assert_eq!(result.phase, ProjectPhase::Procurement);

    assert_eq!(extract_lpo_numbers("LPO 123 ref lpo-123"), vec!["LPO-123"]);
    assert!(extract_lpo_numbers("no order numbers here").is_empty());
}

#[test]
fn test_phase_keywords_respect_word_boundaries() {
    assert_eq!(classify_phase("Purchase Order follow-up"), ProjectPhase::Procurement);
    assert_eq!(classify_phase("Customs clearance DAS"), ProjectPhase::Customs);
    assert_eq!(classify_phase("MTC submission"), ProjectPhase::Certification);
    // "order" must not fire inside "reorder".
    assert_eq!(classify_phase("Reordered list"), ProjectPhase::General);
}
