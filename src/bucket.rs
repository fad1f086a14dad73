/// Bucket records and the ordered collection they live in
use serde::{Deserialize, Serialize};

/// Creation timestamp in milliseconds, doubling as the bucket identifier
pub type BucketId = i64;

/// A named block of reusable context text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bucket {
    pub id: BucketId,
    pub title: String,
    pub content: String,
}

impl Bucket {
    pub fn new(id: BucketId, title: String, content: String) -> Bucket {
        Bucket { id, title, content }
    }
}

/// Partial update for a bucket; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BucketPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl BucketPatch {
    pub fn title(title: impl Into<String>) -> Self {
        BucketPatch {
            title: Some(title.into()),
            content: None,
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        BucketPatch {
            title: None,
            content: Some(content.into()),
        }
    }

    fn apply(&self, bucket: &mut Bucket) {
        if let Some(title) = &self.title {
            bucket.title = title.clone();
        }
        if let Some(content) = &self.content {
            bucket.content = content.clone();
        }
    }
}

/// Insertion-ordered bucket collection, persisted as a whole
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct BucketList {
    buckets: Vec<Bucket>,
}

impl BucketList {
    pub fn new() -> Self {
        BucketList {
            buckets: Vec::new(),
        }
    }

    pub fn as_slice(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn push(&mut self, bucket: Bucket) {
        self.buckets.push(bucket);
    }

    /// Removes every bucket carrying `id`; ids can collide within one millisecond
    pub fn remove(&mut self, id: BucketId) -> bool {
        let original_len = self.buckets.len();
        self.buckets.retain(|b| b.id != id);
        self.buckets.len() < original_len
    }

    pub fn get(&self, id: BucketId) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.id == id)
    }

    pub fn update(&mut self, id: BucketId, patch: &BucketPatch) -> bool {
        let mut updated = false;
        for bucket in self.buckets.iter_mut().filter(|b| b.id == id) {
            patch.apply(bucket);
            updated = true;
        }
        updated
    }
}

impl From<Vec<Bucket>> for BucketList {
    fn from(buckets: Vec<Bucket>) -> Self {
        BucketList { buckets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_bucket(id: BucketId, title: &str) -> Bucket {
        Bucket::new(id, title.to_string(), format!("{} notes", title))
    }

    #[test]
    fn test_bucket_list_new() {
        let list = BucketList::new();
        assert!(list.is_empty());
    }

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut list = BucketList::new();
        list.push(create_test_bucket(30, "Japan Trip"));
        list.push(create_test_bucket(10, "Diet"));
        list.push(create_test_bucket(20, "Work"));

        let titles: Vec<&str> = list.as_slice().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Japan Trip", "Diet", "Work"]);
    }

    #[test]
    fn test_remove() {
        let mut list = BucketList::new();
        list.push(create_test_bucket(1, "One"));
        list.push(create_test_bucket(2, "Two"));

        assert!(list.remove(1));
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].id, 2);
    }

    #[test]
    fn test_remove_nonexistent() {
        let mut list = BucketList::new();
        list.push(create_test_bucket(1, "One"));

        assert!(!list.remove(99));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut list = BucketList::new();
        list.push(create_test_bucket(1, "Old"));

        assert!(list.update(1, &BucketPatch::title("New")));

        let bucket = list.get(1).unwrap();
        assert_eq!(bucket.title, "New");
        assert_eq!(bucket.content, "Old notes");
    }

    #[test]
    fn test_update_nonexistent() {
        let mut list = BucketList::new();
        list.push(create_test_bucket(1, "Old"));

        assert!(!list.update(2, &BucketPatch::content("x")));
        assert_eq!(list.get(1).unwrap().content, "Old notes");
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut list = BucketList::new();
        list.push(Bucket::new(1698508200000, "Trip".to_string(), "Vegetarian".to_string()));

        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(
            json,
            r#"[{"id":1698508200000,"title":"Trip","content":"Vegetarian"}]"#
        );

        let back: BucketList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_patch_skips_missing_fields() {
        let patch: BucketPatch = serde_json::from_str(r#"{"content":"new"}"#).unwrap();
        assert_eq!(patch, BucketPatch::content("new"));
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"content":"new"}"#);
    }
}
