use std::collections::HashMap;

const EMBEDDED: &str = include_str!("../../data/population.json");

/// Population per ISO 3166-1 alpha-2 country code.
#[derive(Debug, Clone, Default)]
pub struct PopulationTable {
    by_code: HashMap<String, u64>,
}

impl PopulationTable {
    /// The table shipped with the binary.
    pub fn embedded() -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, u64> = serde_json::from_str(EMBEDDED)?;
        Ok(Self::from_pairs(raw))
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let by_code = pairs
            .into_iter()
            .map(|(code, population)| (code.as_ref().to_ascii_uppercase(), population))
            .collect();
        Self { by_code }
    }

    /// Population for `code`, case-insensitive. Zero counts as unknown.
    pub fn get(&self, code: &str) -> Option<u64> {
        self.by_code
            .get(&code.to_ascii_uppercase())
            .copied()
            .filter(|population| *population > 0)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_parses() {
        let table = PopulationTable::embedded().unwrap();
        assert!(table.len() > 150);
        assert!(table.get("gb").unwrap() > 60_000_000);
        assert!(table.get("CZ").is_some());
    }

    #[test]
    fn unknown_and_zero_are_absent() {
        let table = PopulationTable::from_pairs([("AQ", 0u64), ("DE", 83_000_000)]);
        assert_eq!(table.get("AQ"), None);
        assert_eq!(table.get("XX"), None);
        assert_eq!(table.get("de"), Some(83_000_000));
    }
}
