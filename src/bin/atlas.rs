//! Terminal harness for the diagram logic, useful without the 3D shell.
//!
//! `atlas` lists the block layout; `atlas <block-id>` selects the block,
//! prints its AI explanation, and opens a line-by-line chat about it
//! (empty line to quit).

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use attention_atlas::{GeminiClient, Viewer};

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next() {
        None => {
            print_layout();
            Ok(())
        }
        Some(id) => inspect(&id).await,
    }
}

fn print_layout() {
    println!("{:<28} {:<34} {:>7} {:>7}", "id", "label", "y", "color");
    for block in attention_atlas::diagram() {
        println!(
            "{:<28} {:<34} {:>7.2} {:>7}",
            block.id,
            block.label,
            block.position.y,
            block.color.to_hex()
        );
    }
}

async fn inspect(id: &str) -> Result<()> {
    let mut viewer: Viewer<GeminiClient> =
        Viewer::from_env().context("viewer setup failed (is API_KEY set?)")?;

    let block = viewer.select(id)?;
    println!("== {} ==\n", block.label);

    if let Some(text) = viewer.explain_selected().await {
        println!("{text}\n");
    }

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 || line.trim().is_empty() {
            return Ok(());
        }
        viewer
            .send_chat(&line, |chunk| {
                print!("{chunk}");
                let _ = io::stdout().flush();
            })
            .await?;
        println!();
    }
}
