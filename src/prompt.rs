//! Line-oriented terminal implementation of the entry prompt
//!
//! Menus are rendered as numbered lists and the Back/Exit sentinels are
//! reachable everywhere via the `b` and `x` shortcuts (or the words `back`
//! and `exit`). Malformed input re-prompts in place and never reaches the
//! state machine; end of input is treated as Exit.

use crate::entry::{EntryPrompt, Flow};
use crate::error::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const BACK_WORDS: [&str; 2] = ["b", "back"];
const EXIT_WORDS: [&str; 2] = ["x", "exit"];

/// Prompt over stdin/stdout
pub struct ConsolePrompt {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsolePrompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Read one trimmed line; `None` when stdin is closed
    async fn read_line(&mut self) -> Result<Option<String>> {
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    /// Read a line, mapping the sentinel words and end of input
    async fn read_flow(&mut self) -> Result<Flow<String>> {
        match self.read_line().await? {
            None => Ok(Flow::Exit),
            Some(line) => {
                let lowered = line.to_lowercase();
                if BACK_WORDS.contains(&lowered.as_str()) {
                    Ok(Flow::Back)
                } else if EXIT_WORDS.contains(&lowered.as_str()) {
                    Ok(Flow::Exit)
                } else {
                    Ok(Flow::Value(line))
                }
            }
        }
    }
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EntryPrompt for ConsolePrompt {
    async fn select(&mut self, message: &str, choices: &[String]) -> Result<Flow<usize>> {
        loop {
            println!("{message}");
            for (index, choice) in choices.iter().enumerate() {
                println!("  {}) {}", index + 1, choice);
            }
            println!("  (b = back, x = exit)");
            match self.read_flow().await? {
                Flow::Back => return Ok(Flow::Back),
                Flow::Exit => return Ok(Flow::Exit),
                Flow::Value(line) => match line.parse::<usize>() {
                    Ok(number) if (1..=choices.len()).contains(&number) => {
                        return Ok(Flow::Value(number - 1));
                    }
                    _ => println!("Please enter a number between 1 and {}", choices.len()),
                },
            }
        }
    }

    async fn multi_select(
        &mut self,
        message: &str,
        choices: &[String],
    ) -> Result<Flow<Vec<usize>>> {
        loop {
            println!("{message}");
            for (index, choice) in choices.iter().enumerate() {
                println!("  {}) {}", index + 1, choice);
            }
            println!("  (comma-separated numbers, empty for none, b = back, x = exit)");
            match self.read_flow().await? {
                Flow::Back => return Ok(Flow::Back),
                Flow::Exit => return Ok(Flow::Exit),
                Flow::Value(line) => {
                    if line.is_empty() {
                        return Ok(Flow::Value(Vec::new()));
                    }
                    let parsed: std::result::Result<Vec<usize>, _> = line
                        .split(',')
                        .map(|part| part.trim().parse::<usize>())
                        .collect();
                    match parsed {
                        Ok(numbers)
                            if numbers
                                .iter()
                                .all(|number| (1..=choices.len()).contains(number)) =>
                        {
                            let mut indices: Vec<usize> =
                                numbers.into_iter().map(|number| number - 1).collect();
                            indices.sort_unstable();
                            indices.dedup();
                            return Ok(Flow::Value(indices));
                        }
                        _ => println!(
                            "Please enter comma-separated numbers between 1 and {}",
                            choices.len()
                        ),
                    }
                }
            }
        }
    }

    async fn ask_text(&mut self, message: &str) -> Result<Flow<String>> {
        println!("{message}");
        self.read_flow().await
    }

    async fn ask_integer(&mut self, message: &str, min: i64, max: i64) -> Result<Flow<i64>> {
        loop {
            println!("{message}");
            match self.read_flow().await? {
                Flow::Back => return Ok(Flow::Back),
                Flow::Exit => return Ok(Flow::Exit),
                Flow::Value(line) => match line.parse::<i64>() {
                    Ok(value) if (min..=max).contains(&value) => return Ok(Flow::Value(value)),
                    _ => println!("Please enter an integer between {min} and {max}"),
                },
            }
        }
    }

    async fn ask_integer_or_done(
        &mut self,
        message: &str,
        min: i64,
        max: i64,
    ) -> Result<Flow<Option<i64>>> {
        loop {
            println!("{message}");
            match self.read_flow().await? {
                Flow::Back => return Ok(Flow::Back),
                Flow::Exit => return Ok(Flow::Exit),
                Flow::Value(line) => {
                    if line.eq_ignore_ascii_case("done") {
                        return Ok(Flow::Value(None));
                    }
                    match line.parse::<i64>() {
                        Ok(value) if (min..=max).contains(&value) => {
                            return Ok(Flow::Value(Some(value)));
                        }
                        _ => println!("Please enter an integer between {min} and {max}, or 'done'"),
                    }
                }
            }
        }
    }

    async fn ask_positive_f64(&mut self, message: &str, max: Option<f64>) -> Result<Flow<f64>> {
        loop {
            println!("{message}");
            match self.read_flow().await? {
                Flow::Back => return Ok(Flow::Back),
                Flow::Exit => return Ok(Flow::Exit),
                Flow::Value(line) => match line.parse::<f64>() {
                    Ok(value)
                        if value > 0.0 && max.is_none_or(|upper| value <= upper) =>
                    {
                        return Ok(Flow::Value(value));
                    }
                    _ => match max {
                        Some(upper) => {
                            println!("Please enter a positive number no greater than {upper}");
                        }
                        None => println!("Please enter a positive number"),
                    },
                },
            }
        }
    }

    async fn confirm(&mut self, message: &str) -> Result<Flow<bool>> {
        loop {
            println!("{message} (y/n)");
            match self.read_flow().await? {
                Flow::Back => return Ok(Flow::Back),
                Flow::Exit => return Ok(Flow::Exit),
                Flow::Value(line) => match line.to_lowercase().as_str() {
                    "y" | "yes" => return Ok(Flow::Value(true)),
                    "n" | "no" => return Ok(Flow::Value(false)),
                    _ => println!("Please answer 'y' or 'n'"),
                },
            }
        }
    }

    async fn say(&mut self, message: &str) -> Result<()> {
        println!("{message}");
        Ok(())
    }

    async fn warn(&mut self, message: &str) -> Result<()> {
        println!("! {message}");
        Ok(())
    }
}
