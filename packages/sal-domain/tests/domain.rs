use sal_domain::{
	contacts,
	conversation::{ChatMessage, Phase, user_just_confirmed},
	hmo,
	profile::UserProfile,
};

#[test]
fn contact_extraction_buckets_urls_by_hmo() {
	let outro = "\
לפרטים נוספים: https://www.maccabi4u.co.il/benefits
אתר מאוחדת: https://www.meuhedet.co.il/services
שירות כללית: https://www.clalit.co.il/rehab\n";
	let directory = contacts::extract_contacts(outro);

	assert_eq!(directory["מכבי"].links, vec!["https://www.maccabi4u.co.il/benefits"]);
	assert_eq!(directory["מאוחדת"].links, vec!["https://www.meuhedet.co.il/services"]);
	assert_eq!(directory["כללית"].links, vec!["https://www.clalit.co.il/rehab"]);
}

#[test]
fn contact_extraction_keeps_first_link_per_hmo() {
	let outro = "\
https://www.maccabi4u.co.il/first
https://www.maccabi4u.co.il/second\n";
	let directory = contacts::extract_contacts(outro);

	assert_eq!(directory["מכבי"].links, vec!["https://www.maccabi4u.co.il/first"]);
}

#[test]
fn contact_extraction_is_idempotent() {
	let outro = "קישור: https://www.clalit.co.il/page\nקישור: https://www.clalit.co.il/page\n";
	let first = contacts::extract_contacts(outro);
	let second = contacts::extract_contacts(outro);

	assert_eq!(first, second);
	assert_eq!(first["כללית"].links.len(), 1);
}

#[test]
fn contact_extraction_seeds_fallback_phones() {
	let directory = contacts::extract_contacts("");

	assert_eq!(directory["מכבי"].phones, vec!["*3555"]);
	assert_eq!(directory["מאוחדת"].phones, vec!["*3833"]);
	assert_eq!(directory["כללית"].phones, vec!["*2700"]);
	assert!(directory.values().all(|info| info.links.is_empty()));
}

#[test]
fn namespace_mapping_covers_all_hmos() {
	for kupa in hmo::HMOS {
		assert_ne!(hmo::namespace_for(kupa), hmo::FALLBACK_NAMESPACE);
	}

	assert_eq!(hmo::namespace_for("הראל"), hmo::FALLBACK_NAMESPACE);
}

#[test]
fn confirmation_requires_both_sides() {
	let confirmed = vec![
		ChatMessage::assistant("סיכמתי את הפרטים. אנא אשר שהכל נכון."),
		ChatMessage::user("כן"),
	];

	assert!(user_just_confirmed(&confirmed));

	let no_request =
		vec![ChatMessage::assistant("איזו קופה אתה חבר בה?"), ChatMessage::user("כן")];

	assert!(!user_just_confirmed(&no_request));

	let lone_confirmation = vec![ChatMessage::user("כן")];

	assert!(!user_just_confirmed(&lone_confirmation));
}

#[test]
fn confirmation_accepts_english_affirmations() {
	let history = vec![
		ChatMessage::assistant("Please confirm that these details are correct."),
		ChatMessage::user("Yes, confirmed."),
	];

	assert!(user_just_confirmed(&history));
}

#[test]
fn confirmation_ignores_last_assistant_message() {
	let history = vec![
		ChatMessage::user("כן"),
		ChatMessage::assistant("אנא אשר שהפרטים נכונים."),
	];

	assert!(!user_just_confirmed(&history));
}

#[test]
fn phase_starts_collecting_identity() {
	assert_eq!(Phase::default(), Phase::CollectingIdentity);
}

#[test]
fn phase_serializes_snake_case() {
	let encoded = serde_json::to_string(&Phase::AnsweringQuestions).expect("phase encodes");

	assert_eq!(encoded, "\"answering_questions\"");
}

#[test]
fn profile_decodes_plain_json() {
	let raw = r#"{"first_name": "יוסי", "last_name": "כהן", "id_number": "123456789",
		"gender": "זכר", "age": 35, "hmo_name": "מכבי", "hmo_card_number": "987654321",
		"membership_tier": "זהב"}"#;
	let profile = UserProfile::decode_extraction(raw).expect("profile decodes");

	assert_eq!(profile.first_name, "יוסי");
	assert_eq!(profile.age, "35");
	assert_eq!(profile.hmo_name, "מכבי");
	assert_eq!(profile.membership_tier, "זהב");
	assert!(!profile.is_empty());
}

#[test]
fn profile_decodes_fenced_json() {
	let raw = "```json\n{\"first_name\": \"דנה\", \"hmo_name\": \"כללית\"}\n```";
	let profile = UserProfile::decode_extraction(raw).expect("profile decodes");

	assert_eq!(profile.first_name, "דנה");
	assert_eq!(profile.hmo_name, "כללית");
	assert_eq!(profile.last_name, "");
}

#[test]
fn profile_decode_rejects_garbage() {
	assert!(UserProfile::decode_extraction("Sure! Here are the details you asked for.").is_none());
	assert!(UserProfile::decode_extraction("[1, 2, 3]").is_none());
	assert!(UserProfile::decode_extraction("").is_none());
}

#[test]
fn profile_decode_discards_unknown_keys() {
	let raw = r#"{"first_name": "רון", "favorite_color": "ירוק"}"#;
	let profile = UserProfile::decode_extraction(raw).expect("profile decodes");

	assert_eq!(profile.first_name, "רון");
	assert!(profile.gender.is_empty());
}

#[test]
fn empty_profile_reports_empty() {
	assert!(UserProfile::default().is_empty());
}
