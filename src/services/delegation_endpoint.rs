use std::sync::Arc;
use tracing::instrument;

use crate::models::{Car, Delegation, RepositoryResult};
use crate::repositories::Repository;

/// Delegation and car operations over the delegations table
pub struct DelegationEndpoint {
    delegations: Arc<dyn Repository<Delegation>>,
    cars: Arc<dyn Repository<Car>>,
}

impl DelegationEndpoint {
    pub fn new(
        delegations: Arc<dyn Repository<Delegation>>,
        cars: Arc<dyn Repository<Car>>,
    ) -> Self {
        Self { delegations, cars }
    }

    #[instrument(skip(self, delegation), fields(delegation_id = %delegation.delegation_id, operation = %delegation.operation))]
    pub async fn save_delegation(&self, delegation: &Delegation) -> RepositoryResult<()> {
        self.delegations.save(delegation).await
    }

    #[instrument(skip(self, car), fields(delegation_id = %car.delegation_id, operation = %car.operation))]
    pub async fn save_car(&self, car: &Car) -> RepositoryResult<()> {
        self.cars.save(car).await
    }

    #[instrument(skip(self))]
    pub async fn get_delegation(
        &self,
        delegation_id: &str,
        operation: &str,
    ) -> RepositoryResult<Option<Delegation>> {
        self.delegations.get(delegation_id, operation).await
    }

    #[instrument(skip(self))]
    pub async fn get_car(&self, id: &str, operation: &str) -> RepositoryResult<Option<Car>> {
        self.cars.get(id, operation).await
    }

    #[instrument(skip(self))]
    pub async fn list_delegations_by_id(
        &self,
        delegation_id: &str,
    ) -> RepositoryResult<Vec<Delegation>> {
        self.delegations.list_by_partition(delegation_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_cars_by_id(&self, id: &str) -> RepositoryResult<Vec<Car>> {
        self.cars.list_by_partition(id).await
    }

    /// Cars across every delegation
    #[instrument(skip(self))]
    pub async fn get_all_cars(&self) -> RepositoryResult<Vec<Car>> {
        let cars = self.cars.list_all().await?;
        crate::info_with_trace!(count = cars.len(), "Listed all cars");
        Ok(cars)
    }

    /// Delegations whose operation is `profile`
    #[instrument(skip(self))]
    pub async fn get_all_profile_delegations(&self) -> RepositoryResult<Vec<Delegation>> {
        let profiles: Vec<Delegation> = self
            .delegations
            .list_all()
            .await?
            .into_iter()
            .filter(Delegation::is_profile)
            .collect();

        crate::info_with_trace!(count = profiles.len(), "Listed profile delegations");
        Ok(profiles)
    }
}
