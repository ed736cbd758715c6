use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// 逐行读取终端输入
pub struct Input {
    lines: Lines<BufReader<Stdin>>,
}

impl Input {
    pub fn new() -> Self {
        Input { lines: BufReader::new(tokio::io::stdin()).lines() }
    }

    /// 打印提示符并读取一行。输入结束 (EOF) 时返回 None。
    pub async fn prompt(&mut self, text: &str) -> std::io::Result<Option<String>> {
        print!("{text}");
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_string()))
    }
}
