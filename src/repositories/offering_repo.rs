//! Offering (service/course catalog) repository.

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{
    NewOffering, NewOfferingOption, Offering, OfferingKind, OfferingOption, UpdateOffering,
    UpdateOfferingOption,
};

#[derive(Clone)]
pub struct OfferingRepository {
    pool: AsyncDbPool,
}

impl OfferingRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_offering: NewOffering) -> Result<Offering, AppError> {
        use crate::schema::offerings::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(offerings)
            .values(&new_offering)
            .returning(Offering::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, offering_id: i32) -> Result<Option<Offering>, AppError> {
        use crate::schema::offerings::dsl::*;
        let mut conn = self.pool.get().await?;

        offerings
            .filter(id.eq(offering_id))
            .select(Offering::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn list(&self, kind_filter: Option<OfferingKind>) -> Result<Vec<Offering>, AppError> {
        use crate::schema::offerings::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut query = offerings.select(Offering::as_select()).into_boxed();
        if let Some(wanted) = kind_filter {
            query = query.filter(kind.eq(wanted));
        }

        query
            .order(id.asc())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn update(
        &self,
        offering_id: i32,
        update_data: UpdateOffering,
    ) -> Result<Offering, AppError> {
        use crate::schema::offerings::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(offerings.filter(id.eq(offering_id)))
            .set(&update_data)
            .returning(Offering::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn update_price(
        &self,
        offering_id: i32,
        new_price: BigDecimal,
    ) -> Result<Offering, AppError> {
        use crate::schema::offerings::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(offerings.filter(id.eq(offering_id)))
            .set(price.eq(new_price))
            .returning(Offering::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Offerings referenced by availabilities fail here with a foreign key
    /// violation; that surfaces as a 400, which keeps referential integrity
    /// the database's problem.
    pub async fn delete(&self, offering_id: i32) -> Result<usize, AppError> {
        use crate::schema::offerings::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(offerings.filter(id.eq(offering_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn add_option(
        &self,
        new_option: NewOfferingOption,
    ) -> Result<OfferingOption, AppError> {
        use crate::schema::offering_options::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(offering_options)
            .values(&new_option)
            .returning(OfferingOption::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_option(&self, option_id: i32) -> Result<Option<OfferingOption>, AppError> {
        use crate::schema::offering_options::dsl::*;
        let mut conn = self.pool.get().await?;

        offering_options
            .filter(id.eq(option_id))
            .select(OfferingOption::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn list_options(&self, offering: i32) -> Result<Vec<OfferingOption>, AppError> {
        use crate::schema::offering_options::dsl::*;
        let mut conn = self.pool.get().await?;

        offering_options
            .filter(offering_id.eq(offering))
            .select(OfferingOption::as_select())
            .order(id.asc())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Resolves option names to options of the given offering, preserving
    /// the caller's order. Unknown names are skipped, matching how the
    /// legacy flow treated stale selections.
    pub async fn options_by_names(
        &self,
        offering: i32,
        names: &[String],
    ) -> Result<Vec<OfferingOption>, AppError> {
        use crate::schema::offering_options::dsl::*;
        let mut conn = self.pool.get().await?;

        let found: Vec<OfferingOption> = offering_options
            .filter(offering_id.eq(offering))
            .filter(name.eq_any(names))
            .select(OfferingOption::as_select())
            .load(&mut conn)
            .await?;

        let ordered = names
            .iter()
            .filter_map(|wanted| found.iter().find(|option| &option.name == wanted).cloned())
            .collect();
        Ok(ordered)
    }

    pub async fn update_option(
        &self,
        option_id: i32,
        update_data: UpdateOfferingOption,
    ) -> Result<OfferingOption, AppError> {
        use crate::schema::offering_options::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(offering_options.filter(id.eq(option_id)))
            .set(&update_data)
            .returning(OfferingOption::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn delete_option(&self, option_id: i32) -> Result<usize, AppError> {
        use crate::schema::offering_options::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(offering_options.filter(id.eq(option_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
