//! 更新联系手机处理器

use std::sync::Arc;

use async_trait::async_trait;
use mall_cqrs_core::CommandHandler;
use mall_errors::{AppError, AppResult};
use tracing::info;

use crate::application::commands::user::UpdateContactCommand;
use crate::domain::access;
use crate::domain::unit_of_work::UnitOfWorkFactory;
use crate::domain::value_objects::PhoneNumber;

/// 更新联系手机处理器
///
/// 更换号码会清除 phone_verified，直到重新通过 OTP 验证。
pub struct UpdateContactHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl UpdateContactHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow_factory }
    }
}

#[async_trait]
impl CommandHandler<UpdateContactCommand> for UpdateContactHandler {
    async fn handle(&self, command: UpdateContactCommand) -> AppResult<()> {
        let phone = PhoneNumber::new(&command.phone)?;

        let uow = self.uow_factory.begin().await?;

        let mut actor = uow
            .users()
            .find_by_id(&command.actor_id)
            .await?
            .ok_or_else(|| AppError::not_found("Acting user not found"))?;

        if !access::user_owns(&actor, &command.user_id) {
            uow.rollback().await?;
            return Err(AppError::forbidden(
                "Cannot modify another user's contact details",
            ));
        }

        actor.set_phone(phone);
        uow.users().update(&actor).await?;
        uow.commit().await?;

        info!(user_id = %actor.id, "Contact phone updated, pending OTP verification");

        Ok(())
    }
}
