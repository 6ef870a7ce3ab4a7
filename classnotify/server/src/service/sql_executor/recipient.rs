use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{Executor, Postgres};

use crate::{
    entity::Recipient,
    service::error::{self, Result},
};

/// Students enrolled in a class, one row per distinct address.
///
/// Ordered by email so repeated resolutions of an unchanged store return the
/// same sequence.
const LIST_CLASS_STUDENTS: &str = "
SELECT DISTINCT u.email, u.full_name, u.role
FROM users AS u
INNER JOIN class_enrollments AS e ON e.user_id = u.id
WHERE e.class_id = $1 AND u.role = 'student'
ORDER BY u.email
";

#[async_trait]
pub trait RecipientSqlExecutor {
    async fn list_class_students(&mut self, class_id: &str) -> Result<Vec<Recipient>>;
}

#[async_trait]
impl<E> RecipientSqlExecutor for E
where
    for<'c> &'c mut E: Executor<'c, Database = Postgres>,
{
    async fn list_class_students(&mut self, class_id: &str) -> Result<Vec<Recipient>> {
        let recipients = sqlx::query_as::<_, Recipient>(LIST_CLASS_STUDENTS)
            .bind(class_id)
            .fetch_all(&mut *self)
            .await
            .with_context(|_| error::ListClassStudentsSnafu { class_id: class_id.to_string() })?;

        Ok(recipients)
    }
}
