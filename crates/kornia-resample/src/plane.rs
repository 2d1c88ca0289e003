use crate::{
    error::ResampleError,
    resampler::{OutputLine, Resampler, ResamplerConfig, StreamState},
};

/// Size of a plane of samples in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaneSize {
    /// Width of the plane in pixels.
    pub width: usize,
    /// Height of the plane in pixels.
    pub height: usize,
}

impl std::fmt::Display for PlaneSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "PlaneSize {{ width: {}, height: {} }}", self.width, self.height)
    }
}

impl From<[usize; 2]> for PlaneSize {
    fn from(size: [usize; 2]) -> Self {
        PlaneSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl PlaneSize {
    /// The number of samples of the plane.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

// pull every destination row that is ready
fn drain(resampler: &mut Resampler, dst: &mut Vec<f32>) -> Result<(), ResampleError> {
    while let OutputLine::Ready(line) = resampler.get_line()? {
        dst.extend_from_slice(line);
    }
    Ok(())
}

fn run(resampler: &mut Resampler, src: &[f32]) -> Result<Vec<f32>, ResampleError> {
    let src_size = resampler.src_size();
    if src.len() != src_size.area() {
        return Err(ResampleError::InvalidPlaneLength(src.len(), src_size.area()));
    }

    let rect = resampler.dst_subrect();
    let mut dst = Vec::new();
    dst.try_reserve_exact(rect.width * rect.height)?;

    for row in src.chunks_exact(src_size.width) {
        resampler.put_line(row)?;
        drain(resampler, &mut dst)?;
    }

    if resampler.state() != StreamState::Done {
        return Err(ResampleError::StreamStalled(resampler.cur_dst_row()));
    }

    Ok(dst)
}

/// Resample a whole plane stored row-major.
///
/// Rows are pushed one at a time and destination rows are pulled as soon as they are ready,
/// so only the rows in flight are buffered.
///
/// # Arguments
///
/// * `src` - The source samples, `config.src_size.width * config.src_size.height` of them.
/// * `config` - The resampler configuration.
///
/// # Returns
///
/// The destination samples of the produced sub-rectangle, row-major.
///
/// Example:
///
/// ```
/// use kornia_resample::{resample_plane, ResamplerConfig};
///
/// let mut config = ResamplerConfig::new([4, 2], [2, 1]);
/// config.filter = "box".to_string();
///
/// let src = vec![0.0, 2.0, 4.0, 6.0, 2.0, 4.0, 6.0, 8.0];
/// let dst = resample_plane(&src, config).unwrap();
///
/// assert_eq!(dst, vec![2.0, 6.0]);
/// ```
pub fn resample_plane(src: &[f32], config: ResamplerConfig) -> Result<Vec<f32>, ResampleError> {
    let mut resampler = Resampler::new(config)?;
    run(&mut resampler, src)
}

/// Resample several planes of the same size with one configuration.
///
/// The contributor lists are computed once and shared by every plane.
///
/// # Arguments
///
/// * `planes` - The source planes, e.g. the channels of an image.
/// * `config` - The resampler configuration shared by all planes.
pub fn resample_planes(
    planes: &[&[f32]],
    mut config: ResamplerConfig,
) -> Result<Vec<Vec<f32>>, ResampleError> {
    let mut out = Vec::new();
    out.try_reserve_exact(planes.len())?;

    for plane in planes {
        let mut resampler = Resampler::new(config.clone())?;
        if config.clist_x.is_none() || config.clist_y.is_none() {
            config.clist_x = Some(resampler.clist_x().clone());
            config.clist_y = Some(resampler.clist_y().clone());
        }
        out.push(run(&mut resampler, plane)?);
    }

    log::debug!("resampled {} planes", planes.len());

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_size() {
        let size = PlaneSize::from([3, 2]);
        assert_eq!(size.width, 3);
        assert_eq!(size.height, 2);
        assert_eq!(size.area(), 6);
        assert_eq!(size.to_string(), "PlaneSize { width: 3, height: 2 }");
    }

    #[test]
    fn test_plane_length_mismatch() {
        let config = ResamplerConfig::new([2, 2], [1, 1]);
        let err = resample_plane(&[0.0; 3], config).err();
        assert_eq!(err, Some(ResampleError::InvalidPlaneLength(3, 4)));
    }

    #[test]
    fn test_planes_share_lists() -> Result<(), ResampleError> {
        let mut config = ResamplerConfig::new([2, 2], [1, 1]);
        config.filter = "box".to_string();
        let a = [1.0, 1.0, 1.0, 1.0];
        let b = [0.0, 2.0, 4.0, 6.0];
        let out = resample_planes(&[&a[..], &b[..]], config)?;
        assert_eq!(out, vec![vec![1.0], vec![3.0]]);
        Ok(())
    }
}
