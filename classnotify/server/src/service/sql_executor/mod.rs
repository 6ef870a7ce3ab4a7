mod recipient;

pub use self::recipient::RecipientSqlExecutor;
