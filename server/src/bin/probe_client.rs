use futures_util::StreamExt;
use shared::ServerMessage;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| format!("ws://127.0.0.1:{}", shared::DEFAULT_PORT));

    println!("Connecting to {}", url);
    let (ws, _) = connect_async(url.as_str()).await?;
    let (_ws_tx, mut ws_rx) = ws.split();

    // First frame must be the greeting
    println!("Waiting for hello...");

    while let Some(frame) = ws_rx.next().await {
        let frame = frame?;
        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => {
                println!("Server closed the connection");
                break;
            }
            _ => continue,
        };

        match serde_json::from_str::<ServerMessage>(&text) {
            Ok(ServerMessage::Hello { ok }) => {
                println!("Connected, ok={}", ok);
            }
            Ok(ServerMessage::Vehicles { data }) => {
                let first = data.features.first();
                match first {
                    Some(feature) => println!(
                        "vehicles: {} features, first id={} at {:?}",
                        data.len(),
                        feature.properties.id,
                        feature.coordinates()
                    ),
                    None => println!("vehicles: empty collection"),
                }
            }
            Ok(ServerMessage::Population { data }) => {
                println!("population: {} weighted points", data.len());
            }
            Err(e) => {
                println!("Unparseable frame ({}): {}", e, text);
            }
        }
    }

    Ok(())
}
