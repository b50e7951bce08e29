//! Geometry for the image cropper and for cover-fitted export images.
//!
//! All values are in pixels. "Display" coordinates refer to the image as
//! scaled into the cropper's container; "source" coordinates refer to the
//! image's natural size.

/// Padding kept around the image inside the cropper container.
pub const CONTAINER_PADDING: f64 = 40.0;

/// Share of the displayed image the initial fit-mode crop box covers.
pub const FIT_BOX_RATIO: f64 = 0.8;

/// JPEG quality of cropped output.
pub const OUTPUT_JPEG_QUALITY: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Cropper mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropMode {
    /// Aspect-locked box the user drags over the image.
    #[default]
    Fit,
    /// Centre crop of the whole image to the output aspect.
    Fill,
}

/// Output size and crop aspect for one image slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropPreset {
    pub output: Size,
    pub aspect: f64,
}

/// Hero image slot.
pub const HERO_PRESET: CropPreset = CropPreset {
    output: Size {
        width: 400.0,
        height: 600.0,
    },
    aspect: 2.0 / 3.0,
};

/// Feature image slot.
pub const FEATURE_PRESET: CropPreset = CropPreset {
    output: Size {
        width: 600.0,
        height: 400.0,
    },
    aspect: 16.0 / 9.0,
};

/// Scale `natural` to fit inside `container` minus padding, keeping aspect.
pub fn display_size(natural: Size, container: Size) -> Size {
    let max_width = container.width - CONTAINER_PADDING;
    let max_height = container.height - CONTAINER_PADDING;
    let aspect = natural.aspect();

    let mut size = Size::new(max_width, max_width / aspect);
    if size.height > max_height {
        size = Size::new(max_height * aspect, max_height);
    }
    size
}

/// Initial crop box over a displayed image.
pub fn initial_crop(display: Size, aspect: f64, mode: CropMode) -> Rect {
    match mode {
        CropMode::Fill => Rect::new(0.0, 0.0, display.width, display.height),
        CropMode::Fit => {
            let limit_w = display.width * FIT_BOX_RATIO;
            let limit_h = display.height * FIT_BOX_RATIO;

            let mut width = limit_w.min(display.height * aspect * FIT_BOX_RATIO);
            let mut height = width / aspect;
            if height > limit_h {
                height = limit_h;
                width = height * aspect;
            }

            Rect::new(
                (display.width - width) / 2.0,
                (display.height - height) / 2.0,
                width,
                height,
            )
        }
    }
}

/// Move the crop box to (`x`, `y`), kept inside the displayed image.
pub fn drag_to(crop: Rect, display: Size, x: f64, y: f64) -> Rect {
    Rect {
        x: x.min(display.width - crop.width).max(0.0),
        y: y.min(display.height - crop.height).max(0.0),
        ..crop
    }
}

/// Region of the natural image drawn into the output.
pub fn source_rect(
    mode: CropMode,
    crop: Rect,
    display: Size,
    natural: Size,
    output: Size,
) -> Rect {
    match mode {
        CropMode::Fit => {
            let scale_x = natural.width / display.width;
            let scale_y = natural.height / display.height;
            Rect::new(
                crop.x * scale_x,
                crop.y * scale_y,
                crop.width * scale_x,
                crop.height * scale_y,
            )
        }
        CropMode::Fill => centre_crop(natural, output.aspect()),
    }
}

/// Largest centred region of `natural` with the given aspect.
pub fn centre_crop(natural: Size, aspect: f64) -> Rect {
    if natural.aspect() > aspect {
        let width = natural.height * aspect;
        Rect::new((natural.width - width) / 2.0, 0.0, width, natural.height)
    } else {
        let height = natural.width / aspect;
        Rect::new(0.0, (natural.height - height) / 2.0, natural.width, height)
    }
}

/// Destination of an image drawn with cover geometry into `area`: scaled to
/// fill it completely and centred, overflowing on one axis.
pub fn cover_rect(image: Size, area: Size) -> Rect {
    let scale = (area.width / image.width).max(area.height / image.height);
    let width = image.width * scale;
    let height = image.height * scale;
    Rect::new(
        (area.width - width) / 2.0,
        (area.height - height) / 2.0,
        width,
        height,
    )
}
