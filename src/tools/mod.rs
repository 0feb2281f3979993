mod command_runner;
mod exif_date;
mod exiftool;
mod file_scanner;
mod file_tools;
mod path_validator;

pub use command_runner::{CommandRunner, SystemCommandRunner};
pub use exif_date::{DateField, DateParseError, parse_exif_date};
pub use exiftool::{
    ExifToolSession, MetadataBackend, MetadataExtractor, MetadataFields, parse_json_output,
};
pub use file_scanner::{CollectedFiles, SYSTEM_FOLDERS, collect_files};
pub use file_tools::{copy_file_synced, move_file};
pub use path_validator::ensure_directory_exists;
