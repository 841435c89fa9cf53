//! bmdsg - 测量图卡渲染命令行工具
//!
//! 从 JSON 图卡定义渲染色度精确的测试图, 输出 16 位 TIFF,
//! 渲染配方嵌入文件元数据.

mod logging;

use clap::Parser;
use std::process;

use bmdsg_chart::{LightSource, RenderOptions, load_chart, render_chart};
use bmdsg_core::{ColorSpace, HdrMetadata, Illuminant, TransferFunction};
use bmdsg_tiff::{TiffWriteParams, write_chart_tiff};

#[derive(Parser, Debug)]
#[command(name = "bmdsg", version, about = "纯 Rust 测量图卡渲染工具")]
struct Cli {
    /// 图卡定义文件路径 (JSON)
    #[arg(short, long)]
    chart: Option<String>,

    /// 输出 TIFF 文件路径
    #[arg(short, long)]
    output: Option<String>,

    /// 输出宽度 (默认取图卡画布宽度)
    #[arg(long)]
    width: Option<u32>,

    /// 输出高度 (默认取图卡画布高度)
    #[arg(long)]
    height: Option<u32>,

    /// 量化位深 (8-16)
    #[arg(long = "bit-depth", default_value_t = 12)]
    bit_depth: u32,

    /// 目标色彩空间 (ITU-R BT.709 / P3-D65 / ITU-R BT.2020)
    #[arg(long, default_value = "ITU-R BT.709")]
    colorspace: String,

    /// 传递函数 (linear / sRGB / gamma2.2 / ST.2084 / HLG)
    #[arg(long, default_value = "sRGB")]
    transfer: String,

    /// 参考白亮度 Y 覆盖值 (默认取图卡声明值)
    #[arg(long = "ref-white")]
    ref_white: Option<f64>,

    /// 为每个色块绘制测量验证标签
    #[arg(long)]
    labels: bool,

    /// 模拟光源 (色温如 "5600" 或标准光源如 "D50")
    #[arg(long)]
    simulate: Option<String>,

    /// 覆盖输出文件
    #[arg(short = 'y', long)]
    overwrite: bool,

    /// 日志级别 (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    logging::init("bmdsg-cli", cli.verbose);

    if cli.chart.is_none() {
        print_banner();
        return;
    }
    let chart_path = cli.chart.as_ref().unwrap();

    if cli.output.is_none() {
        eprintln!("错误: 必须指定输出文件 (-o <输出文件>)");
        process::exit(1);
    }
    let output_path = cli.output.as_ref().unwrap();

    if !cli.overwrite && std::path::Path::new(output_path).exists() {
        eprintln!("错误: 输出文件已存在 '{output_path}', 使用 -y 覆盖");
        process::exit(1);
    }

    if !(8..=16).contains(&cli.bit_depth) {
        eprintln!("错误: 位深必须在 8-16 之间, 得到 {}", cli.bit_depth);
        process::exit(1);
    }

    let colorspace = match ColorSpace::parse(&cli.colorspace) {
        Ok(cs) if cs.is_rgb() => cs,
        Ok(cs) => {
            eprintln!("错误: '{cs}' 不是显示用 RGB 空间");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("错误: {e}");
            process::exit(1);
        }
    };
    let transfer = match TransferFunction::parse(&cli.transfer) {
        Ok(tf) => tf,
        Err(e) => {
            eprintln!("错误: {e}");
            process::exit(1);
        }
    };
    let simulation = cli.simulate.as_deref().map(|s| match parse_light(s) {
        Ok(light) => light,
        Err(msg) => {
            eprintln!("错误: {msg}");
            process::exit(1);
        }
    });

    eprintln!(
        "bmdsg 版本 {} -- 纯 Rust 测量图卡渲染工具",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("图卡: {chart_path}");
    eprintln!("输出: {output_path}");
    eprintln!("目标: {colorspace} / {transfer} / {} 位", cli.bit_depth);

    let layout = match load_chart(chart_path, cli.labels) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("错误: 无法加载图卡: {e}");
            process::exit(1);
        }
    };
    eprintln!("图卡 '{}': {} 个色块", layout.name, layout.patches.len());

    let opts = RenderOptions {
        output_width: cli.width,
        output_height: cli.height,
        bit_depth: cli.bit_depth,
        target_space: colorspace,
        transfer_function: transfer,
        reference_white_y: cli.ref_white,
        simulation,
        include_labels: cli.labels,
    };
    let raster = match render_chart(&layout, &opts) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("错误: 渲染失败: {e}");
            process::exit(1);
        }
    };

    // 硬件送显所需的 HDR 信令, 随光栅一并记入日志
    let hdr = HdrMetadata::for_colorspace(colorspace, transfer);
    log::debug!("HDR 信令: {hdr:?}");

    let ref_white_nits = cli.ref_white.unwrap_or_else(|| {
        layout
            .colorimetry
            .as_ref()
            .map(|c| c.reference_white_y)
            .unwrap_or(100.0)
    });
    let params = TiffWriteParams {
        colorspace,
        transfer_function: transfer,
        bit_depth: cli.bit_depth,
        reference_white_nits: ref_white_nits,
    };
    if let Err(e) = write_chart_tiff(output_path, &raster, &layout, &params) {
        eprintln!("错误: 写出 TIFF 失败: {e}");
        process::exit(1);
    }

    eprintln!();
    eprintln!("渲染完成:");
    eprintln!("  输出尺寸: {}x{}", raster.width(), raster.height());
    eprintln!(
        "  码值范围: 0-{}",
        bmdsg_core::Raster::max_code(cli.bit_depth)
    );
}

/// 解析模拟光源: 数字按色温 (K), 其余按标准光源名
fn parse_light(value: &str) -> Result<LightSource, String> {
    if let Ok(ill) = Illuminant::parse(value) {
        return Ok(LightSource::Illuminant(ill));
    }
    match value.trim_end_matches(['K', 'k']).parse::<f64>() {
        Ok(t) => Ok(LightSource::Cct(t)),
        Err(_) => Err(format!("无法解析光源 '{value}' (期望色温或 D50/D55/D65/D75)")),
    }
}

// ============================================================
// UI
// ============================================================

/// 打印版本横幅
fn print_banner() {
    println!(
        "bmdsg 版本 {} -- 纯 Rust 测量图卡渲染工具",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("用法: bmdsg -c <图卡定义> -o <输出.tiff> [选项]");
    println!();
    println!("选项:");
    println!("  -c <文件>           图卡定义文件 (JSON)");
    println!("  -o <文件>           输出 TIFF 文件");
    println!("  --width <像素>      输出宽度 (默认图卡画布宽度)");
    println!("  --height <像素>     输出高度 (默认图卡画布高度)");
    println!("  --bit-depth <位>    量化位深 8-16 (默认 12)");
    println!("  --colorspace <名>   目标色彩空间 (默认 ITU-R BT.709)");
    println!("  --transfer <名>     传递函数 (默认 sRGB)");
    println!("  --ref-white <Y>     参考白亮度覆盖值");
    println!("  --labels            绘制测量验证标签");
    println!("  --simulate <光源>   模拟光源 (色温或 D50/D55/D65/D75)");
    println!("  -y                  覆盖输出文件");
    println!();
    println!("示例:");
    println!("  bmdsg -c grayscale.json -o chart.tiff                  默认 Rec.709/sRGB");
    println!("  bmdsg -c grayscale.json -o chart.tiff --labels         带测量标签");
    println!("  bmdsg -c hdr.json -o hdr.tiff --colorspace \"ITU-R BT.2020\" --transfer ST.2084");
    println!("  bmdsg -c grayscale.json -o warm.tiff --simulate 5600   5600K 光源模拟");
    println!("  bmdsg -c chart.json -o uhd.tiff --width 3840 --height 2160");
    println!();
    println!("使用 --help 查看完整用法.");
}
