use crate::catalog::domain::metadata_inferrer::{MetadataInferrer, WatchMetadata};

/// Brands recognized in file names, lowercase.
const KNOWN_BRANDS: &[&str] = &[
    "breitling", "cartier", "casio", "citizen", "hamilton", "longines", "omega", "orient",
    "panerai", "rolex", "seiko", "timex", "tissot", "tudor", "zenith",
];

const YEAR_MIN: u32 = 1900;
const YEAR_MAX: u32 = 2099;

/// Guesses watch metadata from tokens in the file name.
///
/// A name like `rolex-submariner-1998.jpg` is split on separators; the
/// first token matching a known brand becomes the brand, the first
/// plausible four-digit number becomes the year, and the tokens after the
/// brand become the model. Without a recognized brand no model is
/// guessed, since the remaining tokens are usually camera noise
/// (`IMG_2043` and the like).
pub struct FilenameMetadataInferrer;

impl FilenameMetadataInferrer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FilenameMetadataInferrer {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataInferrer for FilenameMetadataInferrer {
    fn infer(&self, file_name: &str) -> WatchMetadata {
        let stem = strip_extension(file_name);
        let tokens: Vec<String> = stem
            .split(['-', '_', ' ', '.'])
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();

        let year = tokens.iter().find_map(|t| parse_year(t));
        let brand_index = tokens.iter().position(|t| KNOWN_BRANDS.contains(&t.as_str()));

        let brand = brand_index.map(|i| title_case(&tokens[i]));
        let model = brand_index.and_then(|i| {
            let words: Vec<String> = tokens[i + 1..]
                .iter()
                .filter(|t| parse_year(t).is_none())
                .map(|t| title_case(t))
                .collect();
            if words.is_empty() {
                None
            } else {
                Some(words.join(" "))
            }
        });

        WatchMetadata { brand, model, year }
    }
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

fn parse_year(token: &str) -> Option<u32> {
    if token.len() != 4 {
        return None;
    }
    token
        .parse::<u32>()
        .ok()
        .filter(|y| (YEAR_MIN..=YEAR_MAX).contains(y))
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
