use crate::error::CliResult;
use palau_csv::clean_header_title;

/// Print the original title of each normalized header, one per line
pub fn execute(headers: &[String]) -> CliResult<()> {
    for header in headers {
        println!("{}", clean_header_title(header));
    }
    Ok(())
}
