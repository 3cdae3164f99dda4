use anyhow::Context;
use arguments::Arguments;
use clap::Parser;
use futures::{SinkExt, StreamExt};
use rustyline::{error::ReadlineError, history::DefaultHistory};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

mod arguments;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();

    println!("Connecting to {}", args.address);
    let (websocket, _) = connect_async(args.address.as_str())
        .await
        .with_context(|| format!("Failed to connect to {}", args.address))?;
    let (mut sink, mut stream) = websocket.split();

    // reader task
    tokio::task::spawn(async move {
        while let Some(msg) = stream.next().await {
            match msg {
                Ok(Message::Text(text)) => println!("{text}"),
                Ok(Message::Close(_)) => {
                    println!("Server closed the connection");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    println!("{e}");
                    break;
                }
            }
        }
    });

    // rustyline blocks, so lines are handed over to the async side
    let (line_tx, mut line_rx) = mpsc::channel::<String>(16);
    let editor = tokio::task::spawn_blocking(move || read_lines(line_tx));

    println!("Commands: `exchange` or `exchange <days>`. CTRL+D to quit.");
    while let Some(line) = line_rx.recv().await {
        sink.send(Message::Text(line)).await?;
    }
    sink.close().await?;

    editor.await?
}

fn read_lines(lines: mpsc::Sender<String>) -> anyhow::Result<()> {
    let mut rl = rustyline::Editor::<(), DefaultHistory>::new()?;
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                rl.add_history_entry(&line)?;
                if lines.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL+D");
                break;
            }
            Err(e) => {
                anyhow::bail!("{e:?}");
            }
        }
    }
    Ok(())
}
