use std::collections::HashMap;

use crate::kv::kv_store::KVStore;
use crate::utils::types::Value;

#[derive(Default, Debug)]
pub struct HashMapStore {
    map: HashMap<String, Value>,
}

impl KVStore for HashMapStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    fn put(&mut self, key: &str, value: Value) -> bool {
        self.map.insert(key.to_string(), value).is_some()
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn keys(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_reports_whether_the_key_existed() {
        let mut store = HashMapStore::default();
        assert!(!store.put("a.txt", b"one".to_vec()));
        assert!(store.put("a.txt", b"two".to_vec()));
        assert_eq!(store.get("a.txt"), Some(&b"two".to_vec()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.keys(), vec!["a.txt".to_string()]);
    }
}
