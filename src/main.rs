//! VibeSQL CLI — a REPL and one-shot runner for the execution engine.

use std::io::{self, BufRead, Write};

use vibesql::catalog::Catalog;
use vibesql::engine;
use vibesql::{Error, Output};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut catalog = Catalog::seeded();

    if args.len() > 1 {
        let sql = args[1..].join(" ");
        run_and_print(&sql, &mut catalog);
    } else {
        run_repl(&mut catalog);
    }
}

fn run_repl(catalog: &mut Catalog) {
    println!("VibeSQL v{}", env!("CARGO_PKG_VERSION"));
    println!("Seeded tables: students, tutor_groups, grades. Enter SQL statements (Ctrl+D to exit):\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("sql> ");
        stdout.flush().unwrap();

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {
                let sql = input.trim();
                if sql.is_empty() {
                    continue;
                }
                if sql.eq_ignore_ascii_case("quit") || sql.eq_ignore_ascii_case("exit") {
                    break;
                }
                run_and_print(sql, catalog);
                println!();
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }
}

fn run_and_print(sql: &str, catalog: &mut Catalog) {
    match engine::execute(sql, catalog) {
        Ok(output) => print_output(&output),
        Err(e) => print_error(sql, &e),
    }
}

fn print_output(output: &Output) {
    if output.meta.modified {
        println!("{}", output.rows[0][0]);
        return;
    }
    print!("{}", format_table(output));
}

/// Pipe-table rendering, column widths padded to fit the widest cell.
fn format_table(output: &Output) -> String {
    if output.columns.is_empty() {
        return "(empty result)\n".to_string();
    }

    let cells: Vec<Vec<String>> = output
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = output.columns.iter().map(|c| c.len()).collect();
    for row in &cells {
        for (i, val) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(val.len());
            }
        }
    }

    let mut rendered = String::new();
    let header: Vec<String> = output
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:width$}", c, width = widths[i]))
        .collect();
    rendered.push_str(&format!("| {} |\n", header.join(" | ")));

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    rendered.push_str(&format!("+-{}-+\n", sep.join("-+-")));

    for row in &cells {
        let formatted: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:width$}", v, width = widths.get(i).copied().unwrap_or(0)))
            .collect();
        rendered.push_str(&format!("| {} |\n", formatted.join(" | ")));
    }

    rendered.push_str(&format!("\n({} rows)\n", output.rows.len()));
    rendered
}

fn print_error(sql: &str, error: &Error) {
    eprintln!("Error: {}", error);
    if let Some(span) = error.span() {
        let line_start = sql[..span.start].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = sql[span.start..]
            .find('\n')
            .map(|i| span.start + i)
            .unwrap_or(sql.len());
        let line = &sql[line_start..line_end];
        let col = span.start - line_start;

        eprintln!("  |");
        eprintln!("  | {}", line);
        eprintln!("  | {}^", " ".repeat(col));
    }
}
