/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @Description  : 导出独立 Rust 包的测试
 */

use crate::assert_err;
use crate::nn::{
    GCNConv, GlobalMeanPool, GraphError, GraphWarning, Linear, ModelEngine, ReLU, SaveOutcome,
    Softmax,
};
use approx::assert_abs_diff_eq;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const X: [f32; 12] = [1., 0., 2., 0., 1., 1., 3., 1., 0., 1., 1., 1.];
const EDGE_INDEX: [f32; 8] = [0., 1., 1., 2., 1., 0., 2., 1.];
const BATCH: [f32; 4] = [0., 0., 1., 1.];

/// x[-1,3] -> GCNConv -> ReLU -> GlobalMeanPool -> Linear -> Softmax
fn gnn_engine() -> Result<ModelEngine, GraphError> {
    let mut engine =
        ModelEngine::new(&["x", "edge_index", "batch"], &[&[-1, 3], &[2, -1], &[-1]])?;
    engine.add_module(
        GCNConv::new("x", "edge_index", 3, 4, false, true, true, true)?,
        Some("conv"),
    )?;
    engine.add_module(ReLU::new("conv")?, Some("act"))?;
    engine.add_module(GlobalMeanPool::new("act", "batch")?, Some("pool"))?;
    engine.add_module(Linear::new("pool", 4, 2, true)?, Some("fc"))?;
    engine.add_module(Softmax::new("fc")?, Some("out"))?;

    let lin: Vec<f32> = (0..12).map(|i| (i as f32 - 5.) * 0.1).collect();
    engine.set_weights("conv", &lin)?;
    engine.set_biases("conv", &[0.1, -0.1, 0.2, 0.])?;
    engine.set_weights("fc", &[0.5, -0.5, 1., 0., -1., 0.5, 0., 1.])?;
    engine.set_biases("fc", &[0., 0.1])?;
    Ok(engine)
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).expect("读取生成文件失败")
}

/// 递归读取目录下所有文件（相对路径 -> 内容）
fn read_tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).expect("读取目录失败") {
            let path = entry.expect("读取目录项失败").path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).expect("路径错误").to_path_buf();
                out.insert(rel, fs::read(&path).expect("读取文件失败"));
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

#[test]
fn test_save_package_layout() -> Result<(), GraphError> {
    let temp = tempfile::tempdir().expect("创建临时目录失败");
    let mut engine = gnn_engine()?;

    let outcome = engine.save(temp.path(), "gnn", false)?;
    let dir = temp.path().join("gnn");
    assert_eq!(outcome, SaveOutcome::Written(dir.clone()));
    assert!(outcome.is_written());

    for file in [
        "Cargo.toml",
        "graph.json",
        "src/lib.rs",
        "src/gnn.rs",
        "src/runtime/mod.rs",
        "src/runtime/nn/mod.rs",
        "src/runtime/nn/graph/engine.rs",
        "src/runtime/nn/modules/ops/gcn_conv.rs",
        "src/runtime/tensor/ops/eq.rs",
        "params/conv_lin_weight.dat",
        "params/conv_bias.dat",
        "params/fc_weight.dat",
        "params/fc_bias.dat",
    ] {
        assert!(dir.join(file).is_file(), "缺少文件{file}");
    }
    // 无状态模块没有参数文件
    assert_eq!(fs::read_dir(dir.join("params")).expect("读取目录失败").count(), 4);
    assert!(engine.warnings().is_empty());
    Ok(())
}

#[test]
fn test_save_package_model_source() -> Result<(), GraphError> {
    let temp = tempfile::tempdir().expect("创建临时目录失败");
    let mut engine = gnn_engine()?;
    engine.save(temp.path(), "gnn", false)?;
    let dir = temp.path().join("gnn");

    let model = read(dir.join("src/gnn.rs"));
    assert!(model.contains(
        "use crate::runtime::nn::{GCNConv, GlobalMeanPool, GraphError, Linear, ModelEngine, ReLU, Softmax};"
    ));
    assert!(model.contains("pub struct Gnn {"));
    assert!(model.contains(
        "let mut engine = ModelEngine::new(&[\"x\", \"edge_index\", \"batch\"], &[&[-1, 3], &[2, -1], &[-1]])?;"
    ));

    // 按注册顺序重建模块
    let lines = [
        "engine.add_module(GCNConv::new(\"x\", \"edge_index\", 3, 4, false, true, true, true)?, Some(\"conv\"))?;",
        "engine.add_module(ReLU::new(\"conv\")?, Some(\"act\"))?;",
        "engine.add_module(GlobalMeanPool::new(\"act\", \"batch\")?, Some(\"pool\"))?;",
        "engine.add_module(Linear::new(\"pool\", 4, 2, true)?, Some(\"fc\"))?;",
        "engine.add_module(Softmax::new(\"fc\")?, Some(\"out\"))?;",
    ];
    let positions: Vec<usize> = lines
        .iter()
        .map(|line| model.find(line).unwrap_or_else(|| panic!("缺少`{line}`")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    // 输入只通过 ModelEngine::new 声明
    assert!(!model.contains("Input::"));
    assert!(model.contains("engine.load_parameters()?;"));

    let lib = read(dir.join("src/lib.rs"));
    assert!(lib.contains("pub mod runtime;"));
    assert!(lib.contains("pub use gnn::Gnn;"));

    let cargo = read(dir.join("Cargo.toml"));
    assert!(cargo.contains("name = \"gnn\""));
    assert!(cargo.contains("ndarray = \"0.15\""));
    assert!(cargo.contains("[workspace]"));
    Ok(())
}

#[test]
fn test_save_package_runtime_rewrite() -> Result<(), GraphError> {
    let temp = tempfile::tempdir().expect("创建临时目录失败");
    gnn_engine()?.save(temp.path(), "gnn", false)?;
    let runtime = temp.path().join("gnn/src/runtime");

    let nn_mod = read(runtime.join("nn/mod.rs"));
    assert!(!nn_mod.contains("mod codegen"));
    assert!(!nn_mod.contains("mod descriptor"));
    assert!(!nn_mod.contains("state_dict"));
    assert!(!nn_mod.contains("mod tests"));
    assert!(nn_mod.contains("mod graph;"));

    let engine_src = read(runtime.join("nn/graph/engine.rs"));
    assert!(engine_src.contains("crate::runtime::"));
    assert!(!engine_src.contains("use crate::nn"));
    Ok(())
}

#[test]
fn test_save_package_exists() -> Result<(), GraphError> {
    let temp = tempfile::tempdir().expect("创建临时目录失败");
    let mut engine = gnn_engine()?;
    engine.save(temp.path(), "gnn", false)?;
    let dir = temp.path().join("gnn");
    let before = read_tree(&dir);
    fs::write(dir.join("marker.txt"), "keep").expect("写入文件失败");

    // 1. 未允许覆盖：跳过并警告，目录不变
    let outcome = engine.save(temp.path(), "gnn", false)?;
    assert_eq!(outcome, SaveOutcome::Skipped(dir.clone()));
    assert_eq!(
        engine.warnings(),
        &[GraphWarning::PackageExists { dir: dir.clone() }]
    );
    assert!(dir.join("marker.txt").is_file());

    // 2. 覆盖：先清空，内容与首次导出逐字节相同（中间执行过前向也一样）
    engine.forward(&[&X, &EDGE_INDEX, &BATCH])?;
    let outcome = engine.save(temp.path(), "gnn", true)?;
    assert!(outcome.is_written());
    assert!(!dir.join("marker.txt").exists());
    assert_eq!(read_tree(&dir), before);
    Ok(())
}

#[test]
fn test_save_package_names() -> Result<(), GraphError> {
    let temp = tempfile::tempdir().expect("创建临时目录失败");
    let mut engine = gnn_engine()?;

    for bad in ["", "a/b", "..", "."] {
        assert_err!(engine.save(temp.path(), bad, false), GraphError::InvalidArgument(_));
    }

    // 与计算核同名时类型名追加后缀
    engine.save(temp.path(), "linear", false)?;
    let model = read(temp.path().join("linear/src/linear.rs"));
    assert!(model.contains("pub struct LinearModel {"));

    engine.save(temp.path(), "my-gnn", false)?;
    let lib = read(temp.path().join("my-gnn/src/lib.rs"));
    assert!(lib.contains("pub use my_gnn::MyGnn;"));
    assert!(read(temp.path().join("my-gnn/Cargo.toml")).contains("name = \"my_gnn\""));
    Ok(())
}

#[test]
fn test_save_package_edge_weight() -> Result<(), GraphError> {
    let temp = tempfile::tempdir().expect("创建临时目录失败");
    let mut engine =
        ModelEngine::new(&["x", "edge_index", "edge_weight"], &[&[-1, 2], &[2, -1], &[-1]])?;
    engine.add_module(
        GCNConv::with_edge_weight("x", "edge_index", "edge_weight", 2, 2, true, false, true, false)?,
        Some("conv"),
    )?;
    engine.save(temp.path(), "weighted", false)?;

    let model = read(temp.path().join("weighted/src/weighted.rs"));
    assert!(model.contains(
        "engine.add_module(GCNConv::with_edge_weight(\"x\", \"edge_index\", \"edge_weight\", 2, 2, true, false, true, false)?, Some(\"conv\"))?;"
    ));
    // 无偏置时只有一个参数文件
    assert!(temp.path().join("weighted/params/conv_lin_weight.dat").is_file());
    assert!(!temp.path().join("weighted/params/conv_bias.dat").exists());
    Ok(())
}

#[test]
fn test_saved_parameters_reload() -> Result<(), GraphError> {
    let temp = tempfile::tempdir().expect("创建临时目录失败");
    let mut engine = gnn_engine()?;
    engine.save(temp.path(), "gnn", false)?;
    let expected = engine.forward(&[&X, &EDGE_INDEX, &BATCH])?.clone();
    assert_eq!(expected.shape(), &[2, 2]);

    // 同构的新引擎从导出包的参数目录加载，输出一致
    let mut fresh =
        ModelEngine::new(&["x", "edge_index", "batch"], &[&[-1, 3], &[2, -1], &[-1]])?;
    fresh.add_module(
        GCNConv::new("x", "edge_index", 3, 4, false, true, true, true)?,
        Some("conv"),
    )?;
    fresh.add_module(ReLU::new("conv")?, Some("act"))?;
    fresh.add_module(GlobalMeanPool::new("act", "batch")?, Some("pool"))?;
    fresh.add_module(Linear::new("pool", 4, 2, true)?, Some("fc"))?;
    fresh.add_module(Softmax::new("fc")?, Some("out"))?;
    fresh.set_params_dir(temp.path().join("gnn/params"));
    fresh.load_parameters()?;
    assert!(fresh.warnings().is_empty());

    let out = fresh.forward(&[&X, &EDGE_INDEX, &BATCH])?;
    assert_abs_diff_eq!(out, &expected, epsilon = 1e-6);
    Ok(())
}
