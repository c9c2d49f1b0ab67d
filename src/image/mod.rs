pub mod io;

pub use self::io::{load_rgb_image, save_rgb_image, write_json_file};
