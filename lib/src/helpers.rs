use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

pub fn write_data(path: &Path, data: String) -> io::Result<()> {
    fs::write(path, format!("{data}\n"))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let data = serde_json::to_string_pretty(value)?;

    write_data(path, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_json_is_pretty_with_trailing_newline() {
        let path = std::env::temp_dir()
            .join(format!("question-uploader-{}.json", std::process::id()));

        write_json(&path, &vec!["a", "b"]).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(written, "[\n  \"a\",\n  \"b\"\n]\n");
    }
}
