use std::sync::Arc;
use tracing::instrument;

use crate::models::{Booking, RepositoryResult, User};
use crate::repositories::Repository;

/// User and booking operations over the users table
pub struct UserEndpoint {
    users: Arc<dyn Repository<User>>,
    bookings: Arc<dyn Repository<Booking>>,
}

impl UserEndpoint {
    pub fn new(users: Arc<dyn Repository<User>>, bookings: Arc<dyn Repository<Booking>>) -> Self {
        Self { users, bookings }
    }

    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub async fn save_user(&self, user: &User) -> RepositoryResult<()> {
        self.users.save(user).await
    }

    #[instrument(skip(self, booking), fields(user_id = %booking.user_id, operation = %booking.operation))]
    pub async fn save_booking(&self, booking: &Booking) -> RepositoryResult<()> {
        self.bookings.save(booking).await
    }

    #[instrument(skip(self))]
    pub async fn get_bookings_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Booking>> {
        let bookings = self.bookings.list_by_partition(user_id).await?;
        crate::info_with_trace!(count = bookings.len(), "Listed bookings for user");
        Ok(bookings)
    }
}
