use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tables: ScoringTables,
    #[serde(default)]
    pub transport: TransportConfig,
}

/// Lookup tables consulted by the domain model and the link checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTables {
    /// Substrings that mark a domain as brand-bearing
    pub brand_keywords: Vec<String>,
    /// Final labels (without dot) penalized by the legitimacy model
    pub suspicious_tlds: Vec<String>,
    /// Host suffixes of URL shortening services
    pub shorteners: Vec<String>,
    /// Host suffixes (with leading dot) flagged on links
    pub bad_tlds: Vec<String>,
}

impl Default for ScoringTables {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();

        ScoringTables {
            brand_keywords: owned(&[
                "google",
                "paypal",
                "microsoft",
                "apple",
                "amazon",
                "office",
                "outlook",
                "bank",
                "secure",
                "login",
            ]),
            suspicious_tlds: owned(&["xyz", "top", "click", "shop", "link", "ru", "cn", "work"]),
            shorteners: owned(&["bit.ly", "tinyurl.com", "t.co"]),
            bad_tlds: owned(&[".ru", ".xyz", ".top", ".click", ".shop"]),
        }
    }
}

impl ScoringTables {
    /// Lower-case every entry so lookups can compare against normalized domains
    pub fn normalized(mut self) -> Self {
        for list in [
            &mut self.brand_keywords,
            &mut self.suspicious_tlds,
            &mut self.shorteners,
            &mut self.bad_tlds,
        ] {
            for entry in list.iter_mut() {
                *entry = entry.trim().to_lowercase();
            }
            list.retain(|entry| !entry.is_empty());
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Byte order of the machine running the host; what mail clients use
    #[default]
    Native,
    Little,
    Big,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub byte_order: ByteOrder,
    /// Largest payload accepted from the host, in bytes
    pub max_frame_len: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            byte_order: ByteOrder::Native,
            max_frame_len: 64 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
