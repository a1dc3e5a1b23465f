/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : Linear 模块测试
 */

use crate::assert_err;
use crate::nn::{GraphError, Linear, ModelEngine, TraitModule};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

const X: [f32; 6] = [1., 2., 3., 3., -2., 2.];
const W: [f32; 6] = [1., -1., 2., 0., 2., 1.];
const B: [f32; 2] = [0., 0.5];

#[test]
fn test_linear_forward_matrix() -> Result<(), GraphError> {
    let mut engine = ModelEngine::new(&["x"], &[&[2, 3]])?;
    engine.add_module(Linear::new("x", 3, 2, true)?, Some("fc"))?;
    engine.set_weights("fc", &W)?;
    engine.set_biases("fc", &B)?;

    let out = engine.forward(&[&X])?;
    assert_abs_diff_eq!(out, &Tensor::new(&[5., 7.5, 9., -1.5], &[2, 2]), epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_linear_set_parameters_before_registration() -> Result<(), GraphError> {
    let mut fc = Linear::new("x", 3, 2, true)?;
    fc.set_weights(&W)?;
    fc.set_biases(&B)?;

    let mut engine = ModelEngine::new(&["x"], &[&[-1, 3]])?;
    engine.add_module(fc, Some("fc"))?;

    let out = engine.forward(&[&X])?;
    assert_abs_diff_eq!(out, &Tensor::new(&[5., 7.5, 9., -1.5], &[2, 2]), epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_linear_forward_vector() -> Result<(), GraphError> {
    let mut engine = ModelEngine::new(&["x"], &[&[3]])?;
    engine.add_module(Linear::new("x", 3, 2, true)?, Some("fc"))?;
    engine.set_weights("fc", &W)?;
    engine.set_biases("fc", &B)?;

    let out = engine.forward(&[&[1., 2., 3.]])?;
    assert_abs_diff_eq!(out, &Tensor::new(&[5., 7.5], &[2]), epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_linear_forward_rank3() -> Result<(), GraphError> {
    let mut engine = ModelEngine::new(&["x"], &[&[2, 1, 3]])?;
    engine.add_module(Linear::new("x", 3, 2, true)?, Some("fc"))?;
    engine.set_weights("fc", &W)?;
    engine.set_biases("fc", &B)?;

    let out = engine.forward(&[&X])?;
    assert_abs_diff_eq!(
        out,
        &Tensor::new(&[5., 7.5, 9., -1.5], &[2, 1, 2]),
        epsilon = 1e-6
    );
    Ok(())
}

#[test]
fn test_linear_without_bias() -> Result<(), GraphError> {
    let mut engine = ModelEngine::new(&["x"], &[&[2, 3]])?;
    engine.add_module(Linear::new("x", 3, 2, false)?, Some("fc"))?;
    engine.set_weights("fc", &W)?;
    assert_err!(engine.set_biases("fc", &B), GraphError::InvalidArgument(_));

    let out = engine.forward(&[&X])?;
    assert_abs_diff_eq!(out, &Tensor::new(&[5., 7., 9., -2.], &[2, 2]), epsilon = 1e-6);

    let mut fc = Linear::new("x", 3, 2, false)?;
    assert_err!(fc.set_biases(&B), GraphError::InvalidOperation(_));
    Ok(())
}

#[test]
fn test_linear_default_parameters_are_zero() -> Result<(), GraphError> {
    let mut engine = ModelEngine::new(&["x"], &[&[2, 3]])?;
    engine.add_module(Linear::new("x", 3, 2, true)?, Some("fc"))?;

    let out = engine.forward(&[&X])?;
    assert_eq!(out, &Tensor::zeros(&[2, 2]));
    Ok(())
}

#[test]
fn test_linear_feature_mismatch() -> Result<(), GraphError> {
    let mut engine = ModelEngine::new(&["x"], &[&[2, 4]])?;
    engine.add_module(Linear::new("x", 3, 2, true)?, Some("fc"))?;

    assert_err!(
        engine.forward(&[&[0.; 8]]),
        GraphError::ShapeMismatch(
            [2, 3],
            [2, 4],
            "模块`fc`（Linear）输入的最后一维须等于in_features=3"
        )
    );
    Ok(())
}

#[test]
fn test_linear_invalid_arguments() {
    assert_err!(Linear::new("x", 0, 2, true), GraphError::InvalidArgument(_));
    assert_err!(Linear::new("x", 3, 0, true), GraphError::InvalidArgument(_));

    let mut fc = Linear::new("x", 3, 2, true).expect("创建 Linear 失败");
    assert_err!(
        fc.set_weights(&[1., 2.]),
        GraphError::ParameterSizeMismatch {
            expected: 6,
            got: 2,
            ..
        }
    );
}

#[test]
fn test_linear_contract() -> Result<(), GraphError> {
    let fc = Linear::new("h", 3, 2, true)?;
    assert_eq!(fc.operation(), "Linear");
    assert_eq!(fc.inputs(), &["h".to_string()]);
    assert_eq!(fc.args(), vec!["3", "2", "true"]);
    assert_eq!(fc.constructor(), "new");

    let suffixes: Vec<_> = fc.parameters().iter().map(|p| p.suffix()).collect();
    assert_eq!(suffixes, vec!["weight", "bias"]);
    assert_eq!(fc.parameters()[0].shape(), &[2, 3]);
    assert_eq!(fc.parameters()[1].shape(), &[2]);

    let fc = Linear::new("h", 3, 2, false)?;
    assert_eq!(fc.args(), vec!["3", "2", "false"]);
    assert_eq!(fc.parameters().len(), 1);
    Ok(())
}
