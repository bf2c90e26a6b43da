use std::sync::Arc;

use roam_catalog::sample_popular;
use roam_core::repository::DestinationRepository;
use roam_core::PopularDestination;

use crate::error::ServiceResult;

pub struct DestinationService {
    destinations: Arc<dyn DestinationRepository>,
    popular_limit: usize,
}

impl DestinationService {
    pub fn new(destinations: Arc<dyn DestinationRepository>, popular_limit: usize) -> Self {
        Self {
            destinations,
            popular_limit,
        }
    }

    /// A random handful of destinations, different on every call.
    pub async fn popular(&self) -> ServiceResult<Vec<PopularDestination>> {
        let all = self.destinations.get_all().await?;
        Ok(sample_popular(&all, self.popular_limit, &mut rand::thread_rng()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roam_store::{DbClient, StoreDestinationRepository};

    #[tokio::test]
    async fn test_popular_is_capped_sample() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = Arc::new(StoreDestinationRepository::new(db.pool));
        for i in 0..8 {
            repo.add(&PopularDestination {
                guid: format!("d-{i}"),
                name: format!("Place {i}"),
                image_path: None,
            })
            .await
            .unwrap();
        }

        let svc = DestinationService::new(repo, 5);
        let picked = svc.popular().await.unwrap();
        assert_eq!(picked.len(), 5);

        let mut guids: Vec<_> = picked.iter().map(|d| d.guid.clone()).collect();
        guids.sort();
        guids.dedup();
        assert_eq!(guids.len(), 5);
    }
}
