use std::sync::Arc;

use quill_client::NetworkResult;
use quill_core::Notification;

use crate::mapper;
use crate::remote::RemoteDataSource;

pub struct NotificationRepository {
    remote: Arc<dyn RemoteDataSource>,
}

impl NotificationRepository {
    pub fn new(remote: Arc<dyn RemoteDataSource>) -> Self {
        Self { remote }
    }

    /// Notifications for a user, newest first.
    pub async fn fetch(&self, user_id: &str) -> NetworkResult<Vec<Notification>> {
        self.remote.fetch_notifications(user_id).await.map(|list| {
            let mut list: Vec<Notification> =
                list.into_iter().map(mapper::notification_from_dto).collect();
            list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            list
        })
    }
}
