use std::{
    error::Error as StdError,
    fmt::{self, Write},
};

pub use self::{
    data::{get_data, DataError},
    health_check::health_check,
    index::index,
    test_db_connection::{test_db_connection, ConnectionReport, ConnectionStatus},
};

mod data;
mod health_check;
mod index;
mod test_db_connection;

fn error_chain_msg(err: &impl StdError) -> Result<String, fmt::Error> {
    let mut msg = String::new();
    writeln!(msg, "{}\n", err)?;
    let mut current = err.source();
    while let Some(source) = current {
        writeln!(msg, "caused by:\n\t{}", source)?;
        current = source.source();
    }
    Ok(msg)
}

fn log_error_chain(err: &impl StdError) {
    match error_chain_msg(err) {
        Ok(msg) => tracing::error!("{}", msg),
        Err(_) => tracing::error!("{}", err),
    }
}
