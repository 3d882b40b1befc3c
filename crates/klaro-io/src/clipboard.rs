use anyhow::Context;
use arboard::Clipboard;

/// Put text on the system clipboard. Blocks, so it runs on the blocking pool.
pub async fn copy_text(text: String) -> anyhow::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut clipboard = Clipboard::new().context("Clipboard unavailable")?;
        clipboard
            .set_text(text)
            .context("Failed to write clipboard")?;
        tracing::debug!("Copied text to clipboard");
        Ok::<_, anyhow::Error>(())
    })
    .await?
}
