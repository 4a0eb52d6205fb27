mod dv_scanner;
mod dvrescue_runner;
mod dvrescue_xml;
mod frame_json;
mod frame_source;
mod path_tools;

pub use dv_scanner::{is_dv_file, scan_dv_files};
pub use dvrescue_runner::{DVRESCUE_XML_SUFFIX, dvrescue_xml_path, run_dvrescue};
pub use dvrescue_xml::{parse_dvrescue_xml, read_dvrescue_xml};
pub use frame_json::{FRAME_JSON_SUFFIX, frame_json_path, read_frame_json};
pub use frame_source::load_frames;
pub use path_tools::{ensure_directory_exists, sidecar_path};
