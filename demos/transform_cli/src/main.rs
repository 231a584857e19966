use argh::FromArgs;
use serde::Deserialize;
use std::path::PathBuf;

use warpstudio::image::{Image, ImageSize};
use warpstudio::imgproc::{
    self,
    interpolation::{BorderMode, InterpolationMode},
};
use warpstudio::io::functional as F;
use warpstudio::transform::{
    AffineParams, PerspectiveParams, RotationCenter, RotationParams, SamplingOptions,
    ScalingParams, SimilarityParams, TransformExecutor, TransformJob, TransformParams,
    TranslationParams,
};

#[derive(FromArgs)]
/// Apply a planar geometric transform to an image and save the result
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path of the output image, the extension picks the format (png, jpg, bmp)
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// json job file holding "params" and "sampling", instead of a subcommand
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// interpolation kernel: nearest, linear, cubic or lanczos
    #[argh(option)]
    interpolation: Option<InterpolationMode>,

    /// border policy: constant, replicate, reflect or wrap
    #[argh(option)]
    border: Option<BorderMode>,

    /// fill value of the constant border (0-255)
    #[argh(option)]
    border_value: Option<u8>,

    /// the input file stores its pixels in BGR order
    #[argh(switch)]
    bgr: bool,

    #[argh(subcommand)]
    transform: Option<TransformCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum TransformCommand {
    Translation(TranslationArgs),
    Rotation(RotationArgs),
    Scaling(ScalingArgs),
    Similarity(SimilarityArgs),
    Affine(AffineArgs),
    Perspective(PerspectiveArgs),
}

#[derive(FromArgs)]
/// shift the image by whole pixels
#[argh(subcommand, name = "translation")]
struct TranslationArgs {
    /// horizontal shift in pixels
    #[argh(option, default = "0")]
    tx: i32,

    /// vertical shift in pixels
    #[argh(option, default = "0")]
    ty: i32,
}

#[derive(FromArgs)]
/// rotate the image about a center point
#[argh(subcommand, name = "rotation")]
struct RotationArgs {
    /// angle in degrees, positive is counter-clockwise
    #[argh(option, default = "0.0")]
    angle: f64,

    /// horizontal coordinate of the center, the image midpoint if omitted
    #[argh(option)]
    cx: Option<f64>,

    /// vertical coordinate of the center, the image midpoint if omitted
    #[argh(option)]
    cy: Option<f64>,
}

#[derive(FromArgs)]
/// resize the image by percentages
#[argh(subcommand, name = "scaling")]
struct ScalingArgs {
    /// horizontal scale in percent
    #[argh(option, default = "100.0")]
    sx: f64,

    /// vertical scale in percent
    #[argh(option, default = "100.0")]
    sy: f64,

    /// use the horizontal scale for both axes
    #[argh(switch)]
    keep_aspect: bool,
}

#[derive(FromArgs)]
/// rotate and scale about the image center, then shift
#[argh(subcommand, name = "similarity")]
struct SimilarityArgs {
    /// angle in degrees, positive is counter-clockwise
    #[argh(option, default = "0.0")]
    angle: f64,

    /// uniform scale in percent
    #[argh(option, default = "100.0")]
    scale: f64,

    /// horizontal shift in pixels
    #[argh(option, default = "0")]
    tx: i32,

    /// vertical shift in pixels
    #[argh(option, default = "0")]
    ty: i32,
}

#[derive(FromArgs)]
/// move the control points (50,50), (w-50,50) and (50,h-50) by "dx,dy"
#[argh(subcommand, name = "affine")]
struct AffineArgs {
    /// displacement of the top-left control point
    #[argh(option, from_str_fn(parse_point), default = "(0.0, 0.0)")]
    p1: (f64, f64),

    /// displacement of the top-right control point
    #[argh(option, from_str_fn(parse_point), default = "(0.0, 0.0)")]
    p2: (f64, f64),

    /// displacement of the bottom-left control point
    #[argh(option, from_str_fn(parse_point), default = "(0.0, 0.0)")]
    p3: (f64, f64),
}

#[derive(FromArgs)]
/// send the image corners to new positions given as "x,y"
#[argh(subcommand, name = "perspective")]
struct PerspectiveArgs {
    /// destination of the top-left corner, (0,0) if omitted
    #[argh(option, from_str_fn(parse_point))]
    top_left: Option<(f64, f64)>,

    /// destination of the top-right corner, (w,0) if omitted
    #[argh(option, from_str_fn(parse_point))]
    top_right: Option<(f64, f64)>,

    /// destination of the bottom-left corner, (0,h) if omitted
    #[argh(option, from_str_fn(parse_point))]
    bottom_left: Option<(f64, f64)>,

    /// destination of the bottom-right corner, (w,h) if omitted
    #[argh(option, from_str_fn(parse_point))]
    bottom_right: Option<(f64, f64)>,
}

fn parse_point(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got \"{value}\""))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate \"{s}\": {e}"))
    };
    Ok((parse(x)?, parse(y)?))
}

impl TransformCommand {
    fn to_params(&self, size: ImageSize) -> Result<TransformParams, String> {
        let params = match self {
            TransformCommand::Translation(a) => {
                TransformParams::Translation(TranslationParams { tx: a.tx, ty: a.ty })
            }
            TransformCommand::Rotation(a) => {
                let center = match (a.cx, a.cy) {
                    (None, None) => RotationCenter::Auto,
                    (Some(x), Some(y)) => RotationCenter::Manual { x, y },
                    _ => return Err("--cx and --cy must be given together".to_string()),
                };
                TransformParams::Rotation(RotationParams {
                    angle: a.angle,
                    center,
                })
            }
            TransformCommand::Scaling(a) => TransformParams::Scaling(ScalingParams {
                sx: a.sx,
                sy: a.sy,
                keep_aspect: a.keep_aspect,
            }),
            TransformCommand::Similarity(a) => TransformParams::Similarity(SimilarityParams {
                angle: a.angle,
                scale: a.scale,
                tx: a.tx,
                ty: a.ty,
            }),
            TransformCommand::Affine(a) => TransformParams::Affine(AffineParams {
                deltas: [a.p1, a.p2, a.p3],
            }),
            TransformCommand::Perspective(a) => {
                let corners = PerspectiveParams::identity(size).dst;
                TransformParams::Perspective(PerspectiveParams {
                    dst: [
                        a.top_left.unwrap_or(corners[0]),
                        a.top_right.unwrap_or(corners[1]),
                        a.bottom_left.unwrap_or(corners[2]),
                        a.bottom_right.unwrap_or(corners[3]),
                    ],
                })
            }
        };
        Ok(params)
    }
}

/// The contents of a `--config` job file.
#[derive(Deserialize)]
struct JobFile {
    params: TransformParams,
    #[serde(default)]
    sampling: SamplingOptions,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    // read the image
    let mut image = F::read_image_any_rgb8(&args.input)?;
    if args.bgr {
        let mut rgb = Image::from_size_val(image.size(), 0u8)?;
        imgproc::color::rgb_from_bgr(&image, &mut rgb)?;
        image = rgb;
    }
    log::info!(
        "loaded {} ({}x{})",
        args.input.display(),
        image.width(),
        image.height()
    );

    let (params, mut sampling) = match (&args.config, &args.transform) {
        (Some(path), None) => {
            let job: JobFile = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            (job.params, job.sampling)
        }
        (None, Some(command)) => (command.to_params(image.size())?, SamplingOptions::default()),
        (Some(_), Some(_)) => return Err("pass either --config or a transform, not both".into()),
        (None, None) => return Err("a transform subcommand or --config is required".into()),
    };

    // flags on the command line win over the job file
    if let Some(interpolation) = args.interpolation {
        sampling.interpolation = interpolation;
    }
    if let Some(border) = args.border {
        sampling.border = border;
    }
    if let Some(border_value) = args.border_value {
        sampling.border_value = border_value;
    }

    // run the transform off the main thread and wait for its single outcome
    let executor = TransformExecutor::new();
    let handle = executor.submit(TransformJob::from_owned(image, params, sampling))?;
    let mut output = handle.wait()?;

    if args.bgr {
        let mut bgr = Image::from_size_val(output.size(), 0u8)?;
        imgproc::color::bgr_from_rgb(&output, &mut bgr)?;
        output = bgr;
    }

    F::write_image_rgb8(&args.output, &output)?;
    log::info!(
        "saved {} ({}x{})",
        args.output.display(),
        output.width(),
        output.height()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_points() {
        assert_eq!(parse_point("3,-4.5"), Ok((3.0, -4.5)));
        assert_eq!(parse_point(" 10 , 20 "), Ok((10.0, 20.0)));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn perspective_defaults_to_corners() -> Result<(), String> {
        let command = TransformCommand::Perspective(PerspectiveArgs {
            top_left: None,
            top_right: Some((90.0, 5.0)),
            bottom_left: None,
            bottom_right: None,
        });
        let params = command.to_params(ImageSize {
            width: 100,
            height: 50,
        })?;
        assert_eq!(
            params,
            TransformParams::Perspective(PerspectiveParams {
                dst: [(0.0, 0.0), (90.0, 5.0), (0.0, 50.0), (100.0, 50.0)],
            })
        );
        Ok(())
    }

    #[test]
    fn job_file_sampling_is_optional() -> Result<(), serde_json::Error> {
        let job: JobFile =
            serde_json::from_str(r#"{ "params": { "kind": "scaling", "sx": 50.0 } }"#)?;
        assert_eq!(
            job.params,
            TransformParams::Scaling(ScalingParams {
                sx: 50.0,
                ..Default::default()
            })
        );
        assert_eq!(job.sampling, SamplingOptions::default());
        Ok(())
    }
}
