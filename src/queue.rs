use lapin::{
    options::QueueDeclareOptions, types::FieldTable, Channel, Connection, ConnectionProperties,
};
use secrecy::{ExposeSecret, Secret};

/// Broker connection kept open for the lifetime of the process once the queue
/// has been declared. Nothing publishes to or consumes from it.
#[derive(Debug)]
pub struct DeclaredQueue {
    name: String,
    _channel: Channel,
    connection: Connection,
}

impl DeclaredQueue {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_connected(&self) -> bool {
        self.connection.status().connected()
    }
}

#[tracing::instrument(level = "info", name = "declare message queue", skip(url))]
pub async fn declare(url: &Secret<String>, name: &str) -> Result<DeclaredQueue, lapin::Error> {
    let connection = Connection::connect(url.expose_secret(), ConnectionProperties::default())
        .await
        .map_err(|err| {
            tracing::error!("failed to connect to broker: {:?}", err);
            err
        })?;
    let channel = connection.create_channel().await?;
    let queue = channel
        .queue_declare(name, QueueDeclareOptions::default(), FieldTable::default())
        .await?;
    tracing::info!(
        queue = queue.name().as_str(),
        messages = queue.message_count(),
        "queue declared"
    );

    Ok(DeclaredQueue {
        name: name.to_string(),
        _channel: channel,
        connection,
    })
}
