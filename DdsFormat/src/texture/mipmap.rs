//! Mip chain generation

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::options::MipFilter;

/// Number of levels in a full chain for a `width × height` base.
#[must_use]
pub fn level_count(width: u32, height: u32) -> usize {
    (32 - width.max(height).max(1).leading_zeros()) as usize
}

/// Build the full mip chain for `base`, base level included, down to 1×1.
#[must_use]
pub fn generate_chain(base: RgbaImage, filter: MipFilter) -> Vec<RgbaImage> {
    let count = level_count(base.width(), base.height());
    let mut chain = Vec::with_capacity(count);
    chain.push(base);

    while let Some(previous) = chain.last() {
        let (width, height) = (previous.width(), previous.height());
        if width == 1 && height == 1 {
            break;
        }
        let next = downsample(previous, (width / 2).max(1), (height / 2).max(1), filter);
        chain.push(next);
    }
    chain
}

fn downsample(image: &RgbaImage, width: u32, height: u32, filter: MipFilter) -> RgbaImage {
    match filter {
        // Area averaging
        MipFilter::Box => imageops::thumbnail(image, width, height),
        MipFilter::Tent => imageops::resize(image, width, height, FilterType::Triangle),
        MipFilter::Lanczos4 => imageops::resize(image, width, height, FilterType::Lanczos3),
        MipFilter::Mitchell => imageops::resize(image, width, height, FilterType::CatmullRom),
        MipFilter::Kaiser => imageops::resize(image, width, height, FilterType::Gaussian),
    }
}
