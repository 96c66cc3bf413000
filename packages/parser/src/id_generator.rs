use crc32fast::Hasher;

/// Derive a stable source id from a file path using CRC32
///
/// Anonymous sources share the `<anonymous>` seed, so ids are only
/// unique per parse for them; the `Arc<SourceFile>` identity tells
/// two anonymous sources apart.
pub fn get_source_id(path: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(path.as_bytes());
    format!("{:08x}", hasher.finalize())
}

/// Sequential node id generator for one parsed source
#[derive(Debug, Clone)]
pub struct IDGenerator {
    seed: String,
    count: u32,
}

impl IDGenerator {
    pub fn new(path: &str) -> Self {
        Self {
            seed: get_source_id(path),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_is_stable() {
        assert_eq!(get_source_id("/src/app.js"), get_source_id("/src/app.js"));
        assert_ne!(get_source_id("/src/app.js"), get_source_id("/src/lib.js"));
        assert_eq!(get_source_id("/src/app.js").len(), 8);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IDGenerator::new("/test.js");

        let first = gen.new_id();
        let second = gen.new_id();

        assert!(first.ends_with("-1"));
        assert!(second.ends_with("-2"));
        assert!(first.starts_with(gen.seed()));
    }
}
