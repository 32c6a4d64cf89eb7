// Redis streaming implementation

use anyhow::Result;
use redis::AsyncCommands;
use redis::Client;
use tracing::debug;

use crate::message::MatchResultMessage;

/// Publishes result messages to a Redis stream for out-of-process consumers.
pub struct RedisResultStream {
    client: Client,
    stream_key: String,
}

impl RedisResultStream {
    pub fn new(redis_url: &str, stream_key: &str) -> Result<Self> {
        let client = Client::open(redis_url)?;
        Ok(Self {
            client,
            stream_key: stream_key.to_string(),
        })
    }

    pub async fn publish(&self, message: &MatchResultMessage) -> Result<()> {
        let mut connection = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(message)?;

        let entry_id: String = connection
            .xadd(&self.stream_key, "*", &[("result", payload.as_str())])
            .await?;

        debug!(
            "Published result for match {} to stream '{}' as {}",
            message.match_guid, self.stream_key, entry_id
        );
        Ok(())
    }
}
