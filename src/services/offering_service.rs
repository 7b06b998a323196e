//! Catalog service for offerings and their add-on options.

use bigdecimal::BigDecimal;

use crate::error::{AppError, AppResult};
use crate::models::{
    NewOffering, NewOfferingOption, Offering, OfferingKind, OfferingOption, UpdateOffering,
    UpdateOfferingOption,
};
use crate::repositories::OfferingRepository;

#[derive(Clone)]
pub struct OfferingService {
    repo: OfferingRepository,
}

impl OfferingService {
    pub fn new(repo: OfferingRepository) -> Self {
        Self { repo }
    }

    pub async fn create_offering(&self, new_offering: NewOffering) -> AppResult<Offering> {
        self.repo.create(new_offering).await
    }

    pub async fn get_offering(&self, id: i32) -> AppResult<Offering> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "offering".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            })
    }

    pub async fn list_offerings(&self, kind: Option<OfferingKind>) -> AppResult<Vec<Offering>> {
        self.repo.list(kind).await
    }

    pub async fn update_offering(
        &self,
        id: i32,
        update_data: UpdateOffering,
    ) -> AppResult<Offering> {
        self.get_offering(id).await?;
        self.repo.update(id, update_data).await
    }

    pub async fn update_price(&self, id: i32, new_price: BigDecimal) -> AppResult<Offering> {
        self.get_offering(id).await?;
        self.repo.update_price(id, new_price).await
    }

    pub async fn add_option(
        &self,
        offering_id: i32,
        name: String,
        price: BigDecimal,
    ) -> AppResult<OfferingOption> {
        self.get_offering(offering_id).await?;
        self.repo
            .add_option(NewOfferingOption {
                offering_id,
                name,
                price,
            })
            .await
    }

    pub async fn get_option(&self, option_id: i32) -> AppResult<OfferingOption> {
        self.repo
            .find_option(option_id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "offering_option".to_string(),
                field: "id".to_string(),
                value: option_id.to_string(),
            })
    }

    pub async fn list_options(&self, offering_id: i32) -> AppResult<Vec<OfferingOption>> {
        self.get_offering(offering_id).await?;
        self.repo.list_options(offering_id).await
    }

    pub async fn update_option(
        &self,
        option_id: i32,
        update_data: UpdateOfferingOption,
    ) -> AppResult<OfferingOption> {
        self.get_option(option_id).await?;
        self.repo.update_option(option_id, update_data).await
    }

    pub async fn delete_option(&self, option_id: i32) -> AppResult<bool> {
        let affected = self.repo.delete_option(option_id).await?;
        Ok(affected > 0)
    }
}
