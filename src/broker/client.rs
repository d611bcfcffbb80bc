//! MQTT client task: connect, subscribe, forward payloads

use std::{sync::Arc, time::Duration};

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::events::{Command, Notice, UiEvent};
use crate::settings::ConnectionSettings;
use crate::state::AppState;

/// Keep-alive interval for the broker connection.
const KEEP_ALIVE: Duration = Duration::from_secs(30);
/// Delay before the event loop is polled again after a failure.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Long-running broker client.
///
/// Polls the rumqttc event loop, renews the topic subscription on every
/// connection acknowledgement, and forwards decoded payloads to the timer
/// worker in arrival order. Failures surface as notices and never touch
/// the timer state; the supervisor aborts this task on settings changes.
pub async fn broker_client_task(state: Arc<AppState>, connection: ConnectionSettings) {
    info!(
        "Connecting to {}:{} for topic {}",
        connection.host, connection.port, connection.topic
    );

    let client_id = format!("mqtt-countdown-{}", std::process::id());
    let mut options = MqttOptions::new(client_id, connection.host.clone(), connection.port);
    options.set_keep_alive(KEEP_ALIVE);
    if !connection.username.is_empty() {
        options.set_credentials(connection.username.clone(), connection.password.clone());
    }

    let (client, mut event_loop) = AsyncClient::new(options, 16);
    let mut failing = false;

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                failing = false;
                // Subscriptions do not survive a reconnect; renew on every ack
                match client
                    .subscribe(connection.topic.clone(), QoS::AtMostOnce)
                    .await
                {
                    Ok(()) => {
                        info!("Connected and subscribed to {}", connection.topic);
                        state.publish_event(UiEvent::Notice(Notice::Connected {
                            topic: connection.topic.clone(),
                        }));
                    }
                    Err(e) => {
                        warn!("Subscribe request failed: {}", e);
                        state.publish_event(UiEvent::Notice(Notice::SubscribeFailed(
                            e.to_string(),
                        )));
                    }
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                // Best-effort decode; payloads that fail it also fail the
                // duration parse downstream and are discarded there
                let payload = String::from_utf8_lossy(&publish.payload).into_owned();
                debug!("Message on {}: {:?}", publish.topic, payload);
                state.record_message(&payload);
                if !state.send_command(Command::Message(payload)).await {
                    return;
                }
            }
            Ok(_) => {}
            Err(e) => {
                if !failing {
                    warn!("Broker connection failed: {}", e);
                    state.publish_event(UiEvent::Notice(Notice::ConnectFailed(e.to_string())));
                    failing = true;
                }
                sleep(RETRY_DELAY).await;
            }
        }
    }
}
