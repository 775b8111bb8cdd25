//! Static register programs and the supported mode catalog
//!
//! All tables are compile-time data. The op order inside a list is the
//! exact wire sequence; crop programs in particular interleave readout and
//! output-interface registers and must not be reordered.

use crate::constants::{link, mode};
use crate::data::types::{DriveMode, RegisterList, RegisterOp, ResolutionMode};

use RegisterOp::Write;

/// Common init sequence applied after every power-on
pub static INIT_LIST: RegisterList = RegisterList {
    name: "init",
    ops: &[
        Write { address: 0xFFFF, value: 0x00 }, // Select mode
        Write { address: 0x0171, value: 0x00 }, // Close F_EBD
        Write { address: 0x0172, value: 0x00 }, // Close R_EBD
    ],
};

/// Frame sync setup for register-driven (non interrupt) sync
pub static FRAMESYNC_LIST: RegisterList = RegisterList {
    name: "framesync",
    ops: &[
        Write { address: 0xBF14, value: 0x01 }, // SG_MODE_APL
        Write { address: 0x8AFF, value: 0x0C }, // Hi-Z (input setting or output disabled)
        Write { address: 0x0153, value: 0x00 },
        Write { address: 0x8AF0, value: 0x01 }, // External pulse-based sync
        Write { address: 0x0144, value: 0x00 },
        Write { address: 0x8AF1, value: 0x00 },
    ],
};

static MODE_1920_1536_30FPS_LIST: RegisterList = RegisterList {
    name: "1920x1536@30",
    ops: &[
        Write { address: 0x8AA8, value: 0x01 }, // Crop enable
        Write { address: 0x8AAA, value: 0x80 }, // H size = 1920
        Write { address: 0x8AAB, value: 0x07 },
        Write { address: 0x8AAC, value: 0x00 }, // H cropped 0
        Write { address: 0x8AAD, value: 0x00 },
        Write { address: 0x8AAE, value: 0x00 }, // V size = 1536
        Write { address: 0x8AAF, value: 0x06 },
        Write { address: 0x8AB0, value: 0x00 }, // V cropped 0
        Write { address: 0x8AB1, value: 0x00 },
        Write { address: 0x8ADA, value: 0x03 }, // DCROP_DATA_SEL
        Write { address: 0xBF04, value: 0x01 },
        Write { address: 0xBF06, value: 0x80 },
        Write { address: 0xBF07, value: 0x07 },
        Write { address: 0xBF08, value: 0x00 },
        Write { address: 0xBF09, value: 0x00 },
        Write { address: 0xBF0A, value: 0x00 },
        Write { address: 0xBF0B, value: 0x06 },
        Write { address: 0xBF0C, value: 0x00 },
        Write { address: 0xBF0D, value: 0x00 },
    ],
};

static MODE_1920_1080_30FPS_LIST: RegisterList = RegisterList {
    name: "1920x1080@30",
    ops: &[
        Write { address: 0x8AA8, value: 0x01 }, // Crop enable
        Write { address: 0x8AAA, value: 0x80 }, // H size = 1920
        Write { address: 0x8AAB, value: 0x07 },
        Write { address: 0x8AAC, value: 0x00 }, // H cropped 0
        Write { address: 0x8AAD, value: 0x00 },
        Write { address: 0x8AAE, value: 0x38 }, // V size = 1080
        Write { address: 0x8AAF, value: 0x04 },
        Write { address: 0x8AB0, value: 0xE4 }, // V cropped 228*2
        Write { address: 0x8AB1, value: 0x00 },
        Write { address: 0x8ADA, value: 0x03 }, // DCROP_DATA_SEL
        Write { address: 0xBF04, value: 0x01 },
        Write { address: 0xBF06, value: 0x80 },
        Write { address: 0xBF07, value: 0x07 },
        Write { address: 0xBF08, value: 0x00 },
        Write { address: 0xBF09, value: 0x00 },
        Write { address: 0xBF0A, value: 0x38 },
        Write { address: 0xBF0B, value: 0x04 },
        Write { address: 0xBF0C, value: 0xE4 },
        Write { address: 0xBF0D, value: 0x00 },
    ],
};

static MODE_1280_720_30FPS_LIST: RegisterList = RegisterList {
    name: "1280x720@30",
    ops: &[
        Write { address: 0x8AA8, value: 0x01 }, // Crop enable
        Write { address: 0x8AAA, value: 0x00 }, // H size = 1280
        Write { address: 0x8AAB, value: 0x05 },
        Write { address: 0x8AAC, value: 0x40 }, // H cropped 320*2
        Write { address: 0x8AAD, value: 0x01 },
        Write { address: 0x8AAE, value: 0xD0 }, // V size = 720
        Write { address: 0x8AAF, value: 0x02 },
        Write { address: 0x8AB0, value: 0x98 }, // V cropped 408*2
        Write { address: 0x8AB1, value: 0x01 },
        Write { address: 0x8ADA, value: 0x03 }, // DCROP_DATA_SEL
        Write { address: 0xBF04, value: 0x01 },
        Write { address: 0xBF06, value: 0x00 },
        Write { address: 0xBF07, value: 0x05 },
        Write { address: 0xBF08, value: 0x40 },
        Write { address: 0xBF09, value: 0x01 },
        Write { address: 0xBF0A, value: 0xD0 },
        Write { address: 0xBF0B, value: 0x02 },
        Write { address: 0xBF0C, value: 0x98 },
        Write { address: 0xBF0D, value: 0x01 },
    ],
};

/// Supported resolution modes; the first entry is the default
pub static SUPPORTED_MODES: [ResolutionMode; 3] = [
    ResolutionMode {
        width: 1920,
        height: 1536,
        code: link::PIXEL_CODE_UYVY8,
        datatype: link::DATATYPE_YUV422_8B,
        fps: 30,
        reg_list: &MODE_1920_1536_30FPS_LIST,
    },
    ResolutionMode {
        width: 1920,
        height: 1080,
        code: link::PIXEL_CODE_UYVY8,
        datatype: link::DATATYPE_YUV422_8B,
        fps: 30,
        reg_list: &MODE_1920_1080_30FPS_LIST,
    },
    ResolutionMode {
        width: 1280,
        height: 720,
        code: link::PIXEL_CODE_UYVY8,
        datatype: link::DATATYPE_YUV422_8B,
        fps: 30,
        reg_list: &MODE_1280_720_30FPS_LIST,
    },
];

/// Drive mode lookup table (lane count x frame rate -> mode code)
pub static DRIVE_MODES: [DriveMode; 3] = [
    DriveMode { lanes: 4, fps: 60, code: mode::DRIVE_4LANES_60FPS },
    DriveMode { lanes: 4, fps: 30, code: mode::DRIVE_4LANES_30FPS },
    DriveMode { lanes: 2, fps: 30, code: mode::DRIVE_2LANES_30FPS },
];

/// The default mode (first catalog entry)
pub fn default_mode() -> &'static ResolutionMode {
    &SUPPORTED_MODES[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_first_entry() {
        let mode = default_mode();
        assert!(std::ptr::eq(mode, &SUPPORTED_MODES[0]));
        assert_eq!(mode.width, 1920);
        assert_eq!(mode.height, 1536);
        assert_eq!(mode.fps, 30);
    }

    #[test]
    fn test_mode_lists_are_pure_writes() {
        // Crop programs contain no delays; a Delay sneaking in would
        // change stream start latency.
        for mode in &SUPPORTED_MODES {
            for op in mode.reg_list.ops {
                assert!(matches!(op, RegisterOp::Write { .. }));
            }
        }
    }

    #[test]
    fn test_mode_lists_start_with_crop_enable() {
        for mode in &SUPPORTED_MODES {
            assert_eq!(
                mode.reg_list.ops[0],
                RegisterOp::Write { address: 0x8AA8, value: 0x01 }
            );
        }
    }
}
