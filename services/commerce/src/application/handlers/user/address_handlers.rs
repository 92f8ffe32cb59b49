//! 收货地址处理器

use std::sync::Arc;

use async_trait::async_trait;
use mall_cqrs_core::{CommandHandler, QueryHandler};
use mall_errors::{AppError, AppResult};
use tracing::info;

use crate::application::commands::user::{AddAddressCommand, ListAddressesQuery};
use crate::domain::access;
use crate::domain::unit_of_work::UnitOfWorkFactory;
use crate::domain::user::Address;

/// 新增收货地址处理器
pub struct AddAddressHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl AddAddressHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow_factory }
    }
}

#[async_trait]
impl CommandHandler<AddAddressCommand> for AddAddressHandler {
    async fn handle(&self, command: AddAddressCommand) -> AppResult<Address> {
        if command.line1.trim().is_empty()
            || command.city.trim().is_empty()
            || command.country.trim().is_empty()
        {
            return Err(AppError::validation(
                "Address line, city and country must not be blank",
            ));
        }

        let uow = self.uow_factory.begin().await?;

        let actor = uow
            .users()
            .find_by_id(&command.actor_id)
            .await?
            .ok_or_else(|| AppError::not_found("Acting user not found"))?;

        if !access::user_owns(&actor, &command.user_id) {
            uow.rollback().await?;
            return Err(AppError::forbidden("Cannot add an address for another user"));
        }

        let address = Address::new(
            actor.id,
            command.line1,
            command.line2,
            command.city,
            command.country,
        );

        uow.addresses().save(&address).await?;
        uow.commit().await?;

        info!(user_id = %actor.id, address_id = %address.id, "Address added");

        Ok(address)
    }
}

/// 收货地址列表处理器
pub struct ListAddressesHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl ListAddressesHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow_factory }
    }
}

#[async_trait]
impl QueryHandler<ListAddressesQuery> for ListAddressesHandler {
    async fn handle(&self, query: ListAddressesQuery) -> AppResult<Vec<Address>> {
        let uow = self.uow_factory.begin().await?;

        let actor = uow
            .users()
            .find_by_id(&query.actor_id)
            .await?
            .ok_or_else(|| AppError::not_found("Acting user not found"))?;

        if !access::user_owns(&actor, &query.user_id) {
            uow.rollback().await?;
            return Err(AppError::forbidden("Cannot list another user's addresses"));
        }

        let addresses = uow.addresses().find_by_user(&query.user_id).await?;
        uow.rollback().await?;

        Ok(addresses)
    }
}
