//! Parses an HMO benefits page into typed knowledge-base chunks.
//!
//! A benefits page is one HTML document: free text, then one or more tables
//! whose header row names the three HMOs as columns, then free text with
//! contact links. The text before the first table becomes an intro chunk,
//! every `(service, HMO, tier)` cell segment becomes a service chunk, and the
//! text after the last table becomes an outro chunk from which per-HMO
//! contact info is derived.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use sal_domain::{
	chunk::{Chunk, ServiceChunk},
	contacts,
	hmo::{HMOS, TIERS},
};

struct Selectors {
	table: Selector,
	header: Selector,
	row: Selector,
	cell: Selector,
	anchor: Selector,
}

impl Selectors {
	fn new() -> Option<Self> {
		Some(Self {
			table: Selector::parse("table").ok()?,
			header: Selector::parse("th").ok()?,
			row: Selector::parse("tr").ok()?,
			cell: Selector::parse("td").ok()?,
			anchor: Selector::parse("a[href]").ok()?,
		})
	}
}

/// Parses one benefits page. Malformed structure is skipped, not an error:
/// a page without tables yields no chunks, a table without HMO headers is
/// ignored, and rows with other than exactly four cells are dropped.
pub fn parse_benefits_page(html: &str) -> Vec<Chunk> {
	let Some(selectors) = Selectors::new() else {
		return Vec::new();
	};
	let tier_patterns = tier_patterns();
	let document = Html::parse_document(html);
	let tables: Vec<ElementRef> = document.select(&selectors.table).collect();
	let mut chunks = Vec::new();

	let intro_text = tables.first().map(|table| intro_before(*table)).unwrap_or_default();

	if !intro_text.is_empty() {
		chunks.push(Chunk::Intro { text: intro_text.clone() });
	}

	// The first intro line doubles as a page title appended to each service
	// name, which raises recall when users ask about the page's topic.
	let intro_title = intro_text.lines().next().unwrap_or("").trim().to_string();

	for table in &tables {
		parse_table(*table, &selectors, &tier_patterns, &intro_title, &intro_text, &mut chunks);
	}

	let outro_text =
		tables.last().map(|table| outro_after(*table, &selectors.anchor)).unwrap_or_default();
	let trimmed_outro = outro_text.trim();

	if !trimmed_outro.is_empty() {
		chunks.push(Chunk::Outro { text: trimmed_outro.to_string() });
	}

	let directory = contacts::extract_contacts(&outro_text);

	for chunk in &mut chunks {
		if let Chunk::Service(service) = chunk
			&& let Some(info) = directory.get(&service.kupa)
		{
			service.kupa_contacts = info.clone();
		}
	}

	chunks
}

/// One regex per tier: everything after the tier label up to the next tier
/// label or end of text. Benefit text containing a literal tier word
/// mid-sentence will mis-split; that segmentation is part of the contract.
fn tier_patterns() -> Vec<(&'static str, Regex)> {
	TIERS
		.iter()
		.filter_map(|tier| {
			let pattern = format!("{tier}:(.*?)(?:(?:זהב|כסף|ארד):|$)");

			Regex::new(&pattern).ok().map(|regex| (*tier, regex))
		})
		.collect()
}

fn parse_table(
	table: ElementRef,
	selectors: &Selectors,
	tier_patterns: &[(&'static str, Regex)],
	intro_title: &str,
	intro_text: &str,
	chunks: &mut Vec<Chunk>,
) {
	let headers: Vec<String> = table.select(&selectors.header).map(element_text).collect();

	if !headers.iter().any(|header| HMOS.contains(&header.as_str())) {
		return;
	}

	for row in table.select(&selectors.row).skip(1) {
		let cells: Vec<ElementRef> = row.select(&selectors.cell).collect();

		if cells.len() != 4 {
			continue;
		}

		let base_service = element_text(cells[0]);
		let service = if !intro_title.is_empty() && !base_service.contains(intro_title) {
			format!("{base_service} {intro_title}")
		} else {
			base_service
		};

		for (cell, kupa) in cells[1..].iter().zip(HMOS) {
			let raw = element_text(*cell).replace('\n', " ");

			for (maslul, pattern) in tier_patterns {
				let Some(captures) = pattern.captures(&raw) else {
					continue;
				};
				let benefit = captures[1].trim().replace('•', "-");

				// A bare tier label with no text yields no chunk.
				if benefit.is_empty() {
					continue;
				}

				chunks.push(Chunk::Service(ServiceChunk {
					kupa: kupa.to_string(),
					maslul: (*maslul).to_string(),
					service: service.clone(),
					benefit,
					intro: intro_text.to_string(),
					kupa_contacts: Default::default(),
				}));
			}
		}
	}
}

/// Text of the siblings preceding the first table, in document order.
fn intro_before(table: ElementRef) -> String {
	let mut parts = Vec::new();

	for sibling in table.prev_siblings() {
		if let Some(element) = ElementRef::wrap(sibling) {
			let text = element_text(element);

			if !text.is_empty() {
				parts.push(text);
			}
		} else if let Some(text) = sibling.value().as_text() {
			let trimmed = text.trim();

			if !trimmed.is_empty() {
				parts.push(trimmed.to_string());
			}
		}
	}

	parts.reverse();

	parts.join("\n")
}

/// Text of the siblings following the last table, in document order.
/// Paragraph and div text is appended as-is; anchors append
/// `"{link text}: {href}"` so contact URLs survive into the outro.
fn outro_after(table: ElementRef, anchor_selector: &Selector) -> String {
	let mut outro = String::new();

	for sibling in table.next_siblings() {
		let Some(element) = ElementRef::wrap(sibling) else {
			continue;
		};
		let name = element.value().name();

		if name == "a" {
			if let Some(href) = element.value().attr("href") {
				outro.push_str(&format!("{}: {href}\n", element_text(element)));
			}

			continue;
		}
		if matches!(name, "p" | "div") {
			let text = element_text(element);

			if !text.is_empty() {
				outro.push_str(&text);
				outro.push('\n');
			}
		}

		// Anchors nested inside a paragraph still carry their targets.
		for anchor in element.select(anchor_selector) {
			if let Some(href) = anchor.value().attr("href") {
				outro.push_str(&format!("{}: {href}\n", element_text(anchor)));
			}
		}
	}

	outro
}

fn element_text(element: ElementRef) -> String {
	element.text().collect::<String>().trim().to_string()
}
