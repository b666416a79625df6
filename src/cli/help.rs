use colored::Colorize;
use std::io::{self, Write};

pub struct RenderOpts {
    pub show_examples: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        RenderOpts {
            show_examples: true,
        }
    }
}

pub fn render_help<W: Write>(mut out: W, opts: &RenderOpts) -> io::Result<()> {
    writeln!(out, "{}", "Folio - Help".bold())?;
    writeln!(out)?;

    writeln!(out, "{}  folio [--json] [--no-color] <command>", "Usage:".bold())?;
    writeln!(out)?;

    writeln!(out, "{}", "Getting started:".bold())?;
    writeln!(
        out,
        "  {:44} - Create a demo customer, portfolio and assets",
        "seed"
    )?;
    writeln!(
        out,
        "  {:44} - List portfolios with owner and asset count",
        "portfolios list"
    )?;

    writeln!(out)?;
    writeln!(out, "{}", "Reports:".bold())?;
    writeln!(
        out,
        "  {:44} - Daily value, gains and allocation",
        "performance show <id> [period]"
    )?;
    writeln!(
        out,
        "  {:44}   period: MTD|QTD|YTD|1Y|ALL|YYYY|from:to",
        ""
    )?;

    writeln!(out)?;
    writeln!(out, "{}", "Manage:".bold())?;
    for (usage, what) in [
        ("customers add <name>", "Create a customer"),
        ("customers list", "List customers"),
        ("portfolios create <customer> <name>", "Create an empty portfolio"),
        ("portfolios delete <id>", "Delete a portfolio and everything in it"),
        ("assets add <portfolio> <stock|bond|fund> <ticker> <name>", "Add an asset"),
        ("assets list <portfolio>", "List a portfolio's assets"),
        ("assets delete <id>", "Delete an asset and its transactions"),
        ("transactions add <asset> <buy|sell> <qty> <price> <date>", "Record a buy or sell"),
        ("transactions list <asset>", "List an asset's transactions"),
        ("transactions delete <id>", "Delete a transaction"),
    ] {
        writeln!(out, "  {:44} - {}", usage, what)?;
    }

    writeln!(out)?;
    if opts.show_examples {
        writeln!(out, "{}", "Examples:".bold())?;
        writeln!(out, "  folio seed")?;
        writeln!(out, "  folio performance show 1 ALL")?;
        writeln!(out, "  folio --json performance show 1 2025-01-01:2025-03-31")?;
        writeln!(out, "  folio transactions add 1 sell 5 170 2025-02-10")?;
        writeln!(out, "  folio assets add 1 bond UST30 \"US Treasury 30Y\" --coupon-rate 4.5")?;
        writeln!(out)?;
    }

    writeln!(out, "Use --help on any command for details.")?;
    Ok(())
}
