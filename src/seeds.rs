//! Built-in word table. Guarantees the word game is playable without any
//! content endpoint or config file.

use crate::domain::RawWordRecord;

fn word(palavra: &str, imagem: &str, dica: &str) -> RawWordRecord {
  RawWordRecord {
    id: None,
    word: palavra.into(),
    hint: Some(dica.into()),
    image: Some(imagem.into()),
  }
}

pub fn seed_words() -> Vec<RawWordRecord> {
  vec![
    word("Atlas", "/questoes/IMG_4525.PNG", "Primeira vértebra cervical que sustenta o crânio."),
    word("Fêmur", "/questoes/IMG_4526.PNG", "Maior osso do corpo, localizado na coxa."),
    word("Vértebra cervical", "/questoes/IMG_4527.PNG", "Vértebras do pescoço, entre o crânio e o tórax."),
    word("Úmero", "/questoes/IMG_4528.PNG", "Osso longo do braço superior, conecta o ombro ao cotovelo."),
    word("Osso Nasal", "/questoes/IMG_4529.PNG", "Pequenos ossos que formam a ponte do nariz."),
    word("Osso Coxal", "/questoes/IMG_4530.PNG", "Osso par que forma a cintura pélvica."),
    word("Sacro", "/questoes/IMG_4531.PNG", "Ossos vertebrais fundidos entre a coluna lombar e a cauda."),
    word("Occipital", "/questoes/IMG_4532.PNG", "Osso que forma a parte posterior e base do crânio."),
    word("Tíbia", "/questoes/IMG_4533.PNG", "Osso longo da perna, conhecido como canela."),
    word("Rádio-ulna", "/questoes/IMG_4534.PNG", "Osso longo do antebraço, composto por dois ossos fundidos."),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::WordCard;
  use crate::provider::ingest_all;
  use std::collections::HashSet;

  #[test]
  fn seed_words_are_unique_and_clean() {
    let cards: Vec<WordCard> = ingest_all(seed_words());
    assert_eq!(cards.len(), 10);
    let mut seen = HashSet::new();
    for c in &cards {
      assert!(seen.insert(c.word.clone()), "duplicate word {}", c.word);
      assert_eq!(c.word, c.word.to_uppercase());
      assert!(c.image.is_some(), "missing image for {}", c.word);
      assert!(!c.hint.is_empty());
    }
  }
}
