use crate::errors::TensorError;
use crate::tensor::Tensor;

#[test]
fn test_new_scalar_and_matrix() {
    let tensor = Tensor::new(&[1.], &[]);
    assert_eq!(tensor.shape(), &[] as &[usize]);
    assert_eq!(tensor.size(), 1);

    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    assert_eq!(tensor.shape(), &[2, 3]);
    assert_eq!(tensor.dimension(), 2);
    assert_eq!(tensor.data_as_slice(), &[1., 2., 3., 4., 5., 6.]);
}

#[test]
#[should_panic]
fn test_new_invalid_len() {
    let _ = Tensor::new(&[1., 2.], &[1, 1, 1]);
}

#[test]
fn test_try_new_invalid_len() {
    assert_eq!(
        Tensor::try_new(&[1., 2., 3.], &[2, 2]).unwrap_err(),
        TensorError::DataShapeMismatch {
            data_len: 3,
            shape: vec![2, 2],
            expected: 4,
        }
    );
}

#[test]
fn test_zeros() {
    let tensor = Tensor::zeros(&[2, 2]);
    assert_eq!(tensor.to_vec(), vec![0.; 4]);
}

#[test]
fn test_from_array_keeps_logical_order() {
    // 转置后的数组不是标准布局
    let array = ndarray::Array::from_shape_vec((2, 3), vec![1., 2., 3., 4., 5., 6.])
        .unwrap()
        .reversed_axes()
        .into_dyn();
    let tensor = Tensor::from_array(array);
    assert_eq!(tensor.shape(), &[3, 2]);
    assert_eq!(tensor.data_as_slice(), &[1., 4., 2., 5., 3., 6.]);
}
