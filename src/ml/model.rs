use anyhow::Result;
use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::{sigmoid, softmax},
};

use crate::domain::network_shape::{LayerKind, NetworkShape};

#[derive(Config, Debug)]
pub struct DigitMlpConfig {
    /// [input, hidden..., output]
    pub widths: Vec<usize>,
}

impl DigitMlpConfig {
    pub fn from_shape(shape: &NetworkShape) -> Self {
        Self::new(shape.widths().to_vec())
    }

    pub fn shape(&self) -> Result<NetworkShape> {
        NetworkShape::new(self.widths.clone())
    }

    /// One Linear per transition of the shape, weights initialised by burn.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<DigitMlp<B>> {
        let shape = self.shape()?;
        let linears = shape
            .transitions()
            .map(|(d_input, d_output)| LinearConfig::new(d_input, d_output).init(device))
            .collect();
        Ok(DigitMlp { linears })
    }
}

/// Fully-connected classifier: Sigmoid after every hidden projection,
/// Softmax over dim 1 after the last one.
#[derive(Module, Debug)]
pub struct DigitMlp<B: Backend> {
    pub linears: Vec<Linear<B>>,
}

impl<B: Backend> DigitMlp<B> {
    /// images: [batch, input] → class probabilities: [batch, output]
    pub fn forward(&self, images: Tensor<B, 2>) -> Tensor<B, 2> {
        let last = self.linears.len().saturating_sub(1);
        let mut x = images;

        for (i, linear) in self.linears.iter().enumerate() {
            x = linear.forward(x);
            x = if i == last { softmax(x, 1) } else { sigmoid(x) };
        }
        x
    }

    /// Widths recovered from the weight matrices ([d_input, d_output] each)
    pub fn widths(&self) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.linears.len() + 1);
        for (i, linear) in self.linears.iter().enumerate() {
            let [d_input, d_output] = linear.weight.val().dims();
            if i == 0 {
                widths.push(d_input);
            }
            widths.push(d_output);
        }
        widths
    }

    /// The Linear / activation stack this model runs
    pub fn layers(&self) -> Result<Vec<LayerKind>> {
        Ok(NetworkShape::new(self.widths())?.layers())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::network_shape::Activation;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_builder_layer_count_and_activations() {
        let shape  = NetworkShape::new(vec![784, 30, 10]).unwrap();
        let model: DigitMlp<TestBackend> =
            DigitMlpConfig::from_shape(&shape).init(&Default::default()).unwrap();

        assert_eq!(model.linears.len(), 2);
        assert_eq!(model.widths(), vec![784, 30, 10]);
        assert_eq!(
            model.layers().unwrap(),
            vec![
                LayerKind::Linear { d_input: 784, d_output: 30 },
                LayerKind::Activation(Activation::Sigmoid),
                LayerKind::Linear { d_input: 30, d_output: 10 },
                LayerKind::Activation(Activation::Softmax),
            ]
        );
    }

    #[test]
    fn test_builder_with_two_hidden_layers() {
        let model: DigitMlp<TestBackend> = DigitMlpConfig::new(vec![784, 64, 32, 10])
            .init(&Default::default())
            .unwrap();
        let layers = model.layers().unwrap();
        assert_eq!(layers.len(), 6);
        assert_eq!(layers[5], LayerKind::Activation(Activation::Softmax));
        assert_eq!(layers[3], LayerKind::Activation(Activation::Sigmoid));
    }

    #[test]
    fn test_builder_rejects_single_width() {
        let result = DigitMlpConfig::new(vec![784]).init::<TestBackend>(&Default::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_forward_rows_are_probabilities() {
        let device = Default::default();
        let model: DigitMlp<TestBackend> =
            DigitMlpConfig::new(vec![784, 16, 10]).init(&device).unwrap();

        let images = Tensor::<TestBackend, 2>::ones([3, 784], &device);
        let output = model.forward(images);
        assert_eq!(output.dims(), [3, 10]);

        let sums = output.sum_dim(1).into_data().to_vec::<f32>().unwrap();
        for s in sums {
            assert!((s - 1.0).abs() < 1e-4);
        }
    }
}
