/// Bucket CRUD with optimistic persistence

use crate::bucket::{Bucket, BucketId, BucketList, BucketPatch};
use crate::error::BucketError;
use crate::storage::{StorageArea, StorageService};

/// Source of bucket ids
pub trait Clock {
    fn now_millis(&self) -> BucketId;
}

/// In-memory bucket list mirrored to a [`StorageService`]
///
/// Every mutation updates memory first and then writes the full list. A failed
/// write is logged and the in-memory change stays; the next successful save
/// brings storage back in line.
#[derive(Debug, Clone)]
pub struct BucketRepository<A, C> {
    buckets: BucketList,
    service: StorageService<A>,
    clock: C,
}

impl<A: StorageArea + Clone, C: Clock> BucketRepository<A, C> {
    pub async fn open(service: StorageService<A>, clock: C) -> Self {
        let buckets = BucketList::from(service.load().await);
        BucketRepository {
            buckets,
            service,
            clock,
        }
    }

    pub fn buckets(&self) -> &[Bucket] {
        self.buckets.as_slice()
    }

    pub fn get(&self, id: BucketId) -> Option<&Bucket> {
        self.buckets.get(id)
    }

    pub async fn reload(&mut self) {
        self.buckets = BucketList::from(self.service.load().await);
    }

    pub async fn add(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Bucket, BucketError> {
        let (bucket, save) = self.stage_add(title, content)?;
        save.run().await;
        Ok(bucket)
    }

    /// Removes the bucket; an unknown id changes nothing and writes nothing
    pub async fn delete(&mut self, id: BucketId) -> bool {
        match self.stage_delete(id) {
            Some(save) => {
                save.run().await;
                true
            }
            None => false,
        }
    }

    pub async fn update(&mut self, id: BucketId, patch: BucketPatch) -> Result<bool, BucketError> {
        match self.stage_update(id, patch)? {
            Some(save) => {
                save.run().await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Appends in memory now; the returned save writes the resulting list
    pub fn stage_add(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<(Bucket, PendingSave<A>), BucketError> {
        let title = title.into();
        let content = content.into();
        require_text("title", &title)?;
        require_text("content", &content)?;

        let bucket = Bucket::new(self.clock.now_millis(), title, content);
        self.buckets.push(bucket.clone());
        Ok((bucket, self.pending_save()))
    }

    pub fn stage_delete(&mut self, id: BucketId) -> Option<PendingSave<A>> {
        if self.buckets.remove(id) {
            Some(self.pending_save())
        } else {
            None
        }
    }

    pub fn stage_update(
        &mut self,
        id: BucketId,
        patch: BucketPatch,
    ) -> Result<Option<PendingSave<A>>, BucketError> {
        if let Some(title) = &patch.title {
            require_text("title", title)?;
        }
        if let Some(content) = &patch.content {
            require_text("content", content)?;
        }

        if self.buckets.update(id, &patch) {
            Ok(Some(self.pending_save()))
        } else {
            Ok(None)
        }
    }

    fn pending_save(&self) -> PendingSave<A> {
        PendingSave {
            service: self.service.clone(),
            snapshot: self.buckets.as_slice().to_vec(),
        }
    }
}

/// A full-list write captured right after an in-memory change
///
/// Owns its snapshot, so it can run after the repository has moved on.
#[must_use = "the change is not persisted until the save runs"]
pub struct PendingSave<A> {
    service: StorageService<A>,
    snapshot: Vec<Bucket>,
}

impl<A: StorageArea> PendingSave<A> {
    pub fn snapshot(&self) -> &[Bucket] {
        &self.snapshot
    }

    /// Writes the snapshot; failure is logged and nothing is rolled back
    pub async fn run(self) {
        if let Err(e) = self.service.save(&self.snapshot).await {
            log::error!("Failed to save buckets: {}", e);
        }
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), BucketError> {
    if value.is_empty() {
        Err(BucketError::EmptyField { field })
    } else {
        Ok(())
    }
}
