//! Terminal view of the display buffer

use std::io::Write;

use tokio::sync::watch;

use gbhost_shared::LINE_BREAK;

/// Convert display markup for a terminal.
///
/// With `html` the markup is passed through untouched; otherwise each
/// `<br>` becomes a newline.
pub fn render_lines(markup: &str, html: bool) -> String {
    if html {
        markup.to_string()
    } else {
        markup.replace(LINE_BREAK, "\n")
    }
}

/// Re-render on every change until the bridge goes away.
///
/// The buffer only ever grows, so each change writes just the new suffix.
/// Returns the writer once the sender is dropped.
pub async fn follow<W: Write>(mut rx: watch::Receiver<String>, html: bool, mut out: W) -> W {
    let mut shown = 0;

    loop {
        write_new(&rx, &mut shown, html, &mut out);
        if rx.changed().await.is_err() {
            break;
        }
    }
    // Pick up anything appended between the last wake-up and the close.
    write_new(&rx, &mut shown, html, &mut out);

    out
}

fn write_new<W: Write>(rx: &watch::Receiver<String>, shown: &mut usize, html: bool, out: &mut W) {
    let message = rx.borrow();
    let Some(suffix) = message.get(*shown..) else {
        return;
    };
    if suffix.is_empty() {
        return;
    }

    if let Err(e) = out
        .write_all(render_lines(suffix, html).as_bytes())
        .and_then(|_| out.flush())
    {
        tracing::warn!("Failed to write display output: {}", e);
    }
    *shown = message.len();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lines_plain() {
        assert_eq!(
            render_lines("Boot ROM - 256 bytes<br>Cartridge - TETRIS<br>", false),
            "Boot ROM - 256 bytes\nCartridge - TETRIS\n"
        );
    }

    #[test]
    fn test_render_lines_html() {
        assert_eq!(render_lines("a - b<br>", true), "a - b<br>");
    }

    #[tokio::test]
    async fn test_follow_writes_each_append_once() {
        let (tx, rx) = watch::channel(String::new());
        let view = tokio::spawn(follow(rx, false, Vec::new()));

        tx.send_modify(|m| m.push_str("hello, world - <br>"));
        tokio::task::yield_now().await;
        tx.send_modify(|m| m.push_str("a - b<br>"));
        drop(tx);

        let out = view.await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello, world - \na - b\n");
    }

    #[tokio::test]
    async fn test_follow_shows_existing_content() {
        let (tx, rx) = watch::channel(String::from("ready<br>"));
        drop(tx);

        let out = follow(rx, true, Vec::new()).await;
        assert_eq!(String::from_utf8(out).unwrap(), "ready<br>");
    }
}
