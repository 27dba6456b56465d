use async_trait::async_trait;
use comfy_table::{presets::UTF8_FULL, Table};
use fairdice_core::{Console, Die, Menu, ProbabilityMatrix, Result};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Menus on stdout, answers from stdin one line at a time
pub struct StdioConsole {
    lines: Lines<BufReader<Stdin>>,
}

impl StdioConsole {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl Console for StdioConsole {
    async fn ask(&mut self, menu: &Menu) -> Result<Option<String>> {
        println!("{}", menu);
        print!("Your selection: ");
        std::io::stdout().flush()?;

        Ok(self.lines.next_line().await?)
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }

    fn show_help(&mut self, dice: &[Die], matrix: &ProbabilityMatrix) {
        println!("Probability that your die (row) beats mine (column):");
        println!("{}", probability_table(dice, matrix));
        for (index, die) in dice.iter().enumerate() {
            println!("  #{} = {}", index, die);
        }
    }
}

/// Square odds table: one row and one column per die, two decimal places
pub fn probability_table(dice: &[Die], matrix: &ProbabilityMatrix) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec!["User die v".to_string()];
    header.extend((0..dice.len()).map(|index| format!("#{}", index)));
    table.set_header(header);

    for (index, row) in matrix.rows().iter().enumerate() {
        let mut cells = vec![format!("#{}", index)];
        cells.extend(row.iter().map(|p| format!("{:.2}", p)));
        table.add_row(cells);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_table() {
        let dice: Vec<Die> = ["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]
            .iter()
            .map(|spec| spec.parse().unwrap())
            .collect();
        let matrix = ProbabilityMatrix::compute(&dice);

        let rendered = probability_table(&dice, &matrix).to_string();
        assert!(rendered.contains("#2"));
        assert!(rendered.contains("0.50"));
        assert!(rendered.contains("0.56"));
        assert!(rendered.contains("0.44"));
    }
}
