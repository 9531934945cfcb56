use crate::api::{run_api_server, ApiConfig};
use crate::error::{SiftError, SiftResult};
use crate::excel::{extract_headers, project_workbook};
use crate::types::FieldSelection;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Spreadsheet column letter for a 1-based column (1 → A, 27 → AA)
pub fn column_letter(column: u32) -> String {
    let mut result = String::new();
    let mut n = column;
    while n > 0 {
        let rem = (n - 1) % 26;
        result.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    result
}

/// `filtered_<name>` next to the input file
pub fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data.xlsx".to_string());
    input.with_file_name(format!("filtered_{}", name))
}

/// Execute the headers command
pub fn headers(file: PathBuf) -> SiftResult<()> {
    println!("{}", "📋 Sheetsift - Headers".bold().green());
    println!("   File: {}\n", file.display());

    let bytes = fs::read(&file)?;
    let headers = extract_headers(&bytes)?;

    if headers.is_empty() {
        println!("{}", "⚠️  First sheet has no header row".yellow());
        return Ok(());
    }

    for (idx, name) in headers.iter().enumerate() {
        let letter = column_letter(idx as u32 + 1);
        if name.is_empty() {
            println!("   {:>3}  {}", letter, "(blank)".dimmed());
        } else {
            println!("   {:>3}  {}", letter, name.cyan());
        }
    }
    println!();
    println!("   {} columns", headers.len());

    Ok(())
}

/// Execute the filter command
pub fn filter(
    input: PathBuf,
    output: Option<PathBuf>,
    fields: Vec<String>,
    verbose: bool,
) -> SiftResult<()> {
    let selection = FieldSelection::new(fields);
    if selection.is_blank() {
        return Err(SiftError::InputMissing(
            "No fields selected (use --fields Name,Amount)".to_string(),
        ));
    }
    let output = output.unwrap_or_else(|| default_output(&input));

    println!("{}", "🔥 Sheetsift - Column Filter".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!("{}", "📖 Reading workbook...".cyan());
    }
    let bytes = fs::read(&input)?;
    let projection = project_workbook(&bytes, &selection)?;

    if verbose {
        println!("   Matched {} column(s):", projection.column_count());
        for target in &projection.targets {
            println!(
                "      {} ← column {}",
                target.name.bright_blue(),
                column_letter(target.index)
            );
        }
        let missing: Vec<&str> = selection
            .iter()
            .filter(|field| !projection.targets.iter().any(|t| t.name == *field))
            .collect();
        if !missing.is_empty() {
            println!(
                "   {} not found: {}",
                "⚠️ ".yellow(),
                missing.join(", ").yellow()
            );
        }
        println!();
        println!("{}", "💾 Writing workbook...".cyan());
    }

    fs::write(&output, projection.to_bytes()?)?;

    println!("{}", "✅ Filter Complete!".bold().green());
    println!(
        "   {} rows × {} columns → {}\n",
        projection.row_count(),
        projection.column_count(),
        output.display()
    );

    Ok(())
}

/// Execute the serve command
pub fn serve(config: ApiConfig) -> SiftResult<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(run_api_server(config))
        .map_err(|e| SiftError::Io(std::io::Error::other(e.to_string())))
}
