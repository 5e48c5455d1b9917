use crate::models::{TradeEvent, TradeSink};
use std::fs::OpenOptions;
use std::io::{self, Write};


#[derive(Debug, Clone)]
pub enum CL {
    Pink,
    Purple,
    Green,
    LimeGreen,
    DullGreen,
    DimLightBlue,
    Red,
    Orange,
    Teal,
    DullTeal,
    Dull,
    End,
}

impl CL {
    pub fn get(&self) -> &str {
        match self {
            CL::Pink => "\x1b[38;5;165m",
            CL::Purple => "\x1b[38;5;135m",
            CL::Green => "\x1b[38;5;10m",
            CL::LimeGreen => "\x1b[38;5;154m",
            CL::DullGreen => "\x1b[38;5;29m",
            CL::DimLightBlue => "\x1b[38;5;159m",
            CL::Red => "\x1b[38;5;196m",
            CL::Orange => "\x1b[38;5;208m",
            CL::Teal => "\x1b[38;5;14m",
            CL::DullTeal => "\x1b[38;5;153m",
            CL::Dull => "\x1b[38;5;8m",
            CL::End => "\x1b[37m",
        }
    }
}

// =-= TradeLog =-= //
// Append-only CSV of settled trades, one line per fill. Feed it to the
// game as its sink and point your plotting at the file.
pub struct TradeLog {
    file: std::fs::File,
}

impl TradeLog {
    pub fn create(file_path: &str) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        Ok(Self { file })
    }

    fn write_line(&mut self, content: String) -> io::Result<()> {
        writeln!(self.file, "{}", content)
    }
}

impl TradeSink for TradeLog {
    fn on_trade(&mut self, trade: &TradeEvent) {
        let line = format!(
            "{:?},{},{},{}",
            trade.suit, trade.price, trade.buyer, trade.seller
        );
        if let Err(e) = self.write_line(line) {
            println!("{}[!] Error writing trade log: {:?}{}", CL::Red.get(), e, CL::End.get());
        }
    }
}
