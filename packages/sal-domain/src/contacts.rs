//! Derives per-HMO contact info from the free-text outro of a benefits page.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

const URL_PATTERN: &str = r"(https?://[^\s:]+)";

/// Substring markers that classify a URL into exactly one HMO bucket.
const URL_MARKERS: [(&str, &str); 3] =
	[("מכבי", "maccabi"), ("מאוחדת", "meuhedet"), ("כללית", "clalit")];

/// Canonical member-service phone number per HMO, always present.
const FALLBACK_PHONES: [(&str, &str); 3] =
	[("מכבי", "*3555"), ("מאוחדת", "*3833"), ("כללית", "*2700")];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
	/// Sorted, deduplicated phone numbers.
	pub phones: Vec<String>,
	/// At most one canonical URL; the first match per HMO wins.
	pub links: Vec<String>,
}

/// Scans outro text line by line and buckets URLs per HMO, then unions in the
/// fallback phone numbers. Pure and idempotent: duplicate URLs for the same
/// HMO never yield a second stored link.
pub fn extract_contacts(outro: &str) -> BTreeMap<String, ContactInfo> {
	let mut directory: BTreeMap<String, ContactInfo> =
		URL_MARKERS.iter().map(|(kupa, _)| (kupa.to_string(), ContactInfo::default())).collect();
	let url_pattern = Regex::new(URL_PATTERN).ok();

	for line in outro.lines() {
		if !line.to_lowercase().contains("http") {
			continue;
		}
		let Some(url) = url_pattern
			.as_ref()
			.and_then(|pattern| pattern.captures(line))
			.map(|captures| captures[1].to_string())
		else {
			continue;
		};

		for (kupa, marker) in URL_MARKERS {
			if !url.contains(marker) {
				continue;
			}
			if let Some(info) = directory.get_mut(kupa)
				&& info.links.is_empty()
			{
				info.links.push(url.clone());
			}

			break;
		}
	}

	for (kupa, phone) in FALLBACK_PHONES {
		if let Some(info) = directory.get_mut(kupa) {
			let mut phones: BTreeSet<String> = info.phones.iter().cloned().collect();

			phones.insert(phone.to_string());

			info.phones = phones.into_iter().collect();
		}
	}

	directory
}
