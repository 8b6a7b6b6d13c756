//! Result document decoding.
//!
//! A region document has the shape
//!
//! ```text
//! <VYSLEDKY_KRAJ xmlns="http://www.volby.cz/prezident/">
//!   <KRAJ NUTS_KRAJ="CZ010" NAZ_KRAJ="Hlavní město Praha">
//!     <CELKEM>
//!       <HODN_KAND PORADOVE_CISLO="1" HLASY="12345"/>
//!       ...
//!     </CELKEM>
//!     <OKRES NUTS_OKRES="CZ0100" NAZ_OKRES="Praha">
//!       <CELKEM>...</CELKEM>
//!     </OKRES>
//!   </KRAJ>
//! </VYSLEDKY_KRAJ>
//! ```

use std::collections::BTreeMap;

use roxmltree::{Document, Node};

use crate::config::RESULTS_NAMESPACE;
use crate::error::{HarvesterError, Result};
use crate::types::ResultRecord;
use crate::xml::{find_all_by_path, find_child, find_children, parse_attribute, required_attribute};

const REGION_TAG: &str = "KRAJ";
const REGION_ID_ATTR: &str = "NUTS_KRAJ";
const REGION_NAME_ATTR: &str = "NAZ_KRAJ";

const DISTRICT_TAG: &str = "OKRES";
const DISTRICT_ID_ATTR: &str = "NUTS_OKRES";
const DISTRICT_NAME_ATTR: &str = "NAZ_OKRES";

const CANDIDATE_PATH: &str = "CELKEM/HODN_KAND";
const ORDINAL_ATTR: &str = "PORADOVE_CISLO";
const VOTES_ATTR: &str = "HLASY";

/// Decode a region document into a single record.
///
/// # Errors
/// * `XmlParse` if the document is not well-formed
/// * `MissingElement` if there is no `KRAJ` element under the root
/// * `MissingAttribute` / `InvalidNumber` for incomplete candidate entries
/// * `VoteTotalOverflow` if the vote counts do not fit a `u64` total
///
/// # Examples
/// ```
/// use volby_harvester::decode::decode;
///
/// let xml = r#"<VYSLEDKY_KRAJ xmlns="http://www.volby.cz/prezident/">
///   <KRAJ NUTS_KRAJ="CZ010" NAZ_KRAJ="Praha">
///     <CELKEM><HODN_KAND PORADOVE_CISLO="4" HLASY="100"/></CELKEM>
///   </KRAJ>
/// </VYSLEDKY_KRAJ>"#;
///
/// let record = decode(xml).unwrap();
/// assert_eq!(record.region_id(), "CZ010");
/// assert_eq!(record.votes(4), Some(100));
/// ```
pub fn decode(raw: &str) -> Result<ResultRecord> {
    let doc = Document::parse(raw)?;
    let region = region_element(&doc)?;
    decode_region(region, REGION_ID_ATTR, REGION_NAME_ATTR)
}

/// Decode every district (`OKRES`) of a region document, in document order.
///
/// A region without districts yields an empty vector.
///
/// # Errors
/// Same as [`decode`]; the first bad district fails the whole call.
pub fn decode_many(raw: &str) -> Result<Vec<ResultRecord>> {
    let doc = Document::parse(raw)?;
    let region = region_element(&doc)?;

    find_children(region, RESULTS_NAMESPACE, DISTRICT_TAG)
        .map(|district| decode_region(district, DISTRICT_ID_ATTR, DISTRICT_NAME_ATTR))
        .collect()
}

fn region_element<'a, 'input>(doc: &'a Document<'input>) -> Result<Node<'a, 'input>> {
    let root = doc.root_element();
    find_child(root, RESULTS_NAMESPACE, REGION_TAG).ok_or_else(|| {
        HarvesterError::MissingElement {
            element: REGION_TAG.to_string(),
            context: root.tag_name().name().to_string(),
        }
    })
}

fn decode_region(node: Node<'_, '_>, id_attr: &str, name_attr: &str) -> Result<ResultRecord> {
    let region_id = required_attribute(node, id_attr)?;
    let region_name = required_attribute(node, name_attr)?;
    let tallies = decode_tallies(node)?;
    if tallies
        .values()
        .try_fold(0u64, |total, votes| total.checked_add(*votes))
        .is_none()
    {
        return Err(HarvesterError::VoteTotalOverflow {
            region: region_id.to_string(),
        });
    }

    tracing::trace!(region_id, candidates = tallies.len(), "Decoded region");
    Ok(ResultRecord::new(region_id, region_name, tallies))
}

/// Collect `PORADOVE_CISLO` → `HLASY` pairs below `CELKEM/HODN_KAND`.
///
/// A repeated ordinal keeps the last value.
fn decode_tallies(node: Node<'_, '_>) -> Result<BTreeMap<u32, u64>> {
    let mut tallies = BTreeMap::new();
    for candidate in find_all_by_path(node, RESULTS_NAMESPACE, CANDIDATE_PATH) {
        let ordinal: u32 = parse_attribute(candidate, ORDINAL_ATTR)?;
        let votes: u64 = parse_attribute(candidate, VOTES_ATTR)?;
        tallies.insert(ordinal, votes);
    }
    Ok(tallies)
}
