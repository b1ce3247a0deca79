use std::io::{self, Write};
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Line-oriented reader for menu input.
///
/// End of input surfaces as `io::ErrorKind::UnexpectedEof` so the menu loop
/// can unwind from any depth.
pub struct Prompt<R> {
    reader: R,
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub async fn ask<W: Write>(&mut self, out: &mut W, label: &str) -> io::Result<String> {
        write!(out, "{}", label)?;
        out.flush()?;

        let mut buf = String::new();
        if self.reader.read_line(&mut buf).await? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
        }
        Ok(buf.trim_end_matches(['\r', '\n']).to_string())
    }

    /// `None` (after telling the user) when the answer does not parse.
    pub async fn ask_number<T, W>(&mut self, out: &mut W, label: &str) -> io::Result<Option<T>>
    where
        T: FromStr,
        W: Write,
    {
        let raw = self.ask(out, label).await?;
        match raw.trim().parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(out, "Invalid number: '{}'", raw.trim())?;
                Ok(None)
            }
        }
    }
}
